//! Menu Walker - exploratory traversal of two-level app menus.
//!
//! This crate provides:
//! - A validated menu catalog (top-level entries plus one nested level)
//! - A failure-isolated traversal engine producing per-node outcomes
//! - An automation backend trait with WebDriver and mock implementations
//! - Session management for organized report artifacts
//!
//! # Example
//!
//! ```rust
//! use menu_walker::{run_walk, Catalog, MenuNode, MockBackend, WalkerConfig};
//!
//! let catalog = Catalog::new(vec![
//!     MenuNode::with_children("App", ["Alarm", "Notification"]),
//!     MenuNode::leaf("Media"),
//! ]).unwrap();
//!
//! let mut backend = MockBackend::new();
//! let report = run_walk(&catalog, &mut backend, &WalkerConfig::default());
//! assert_eq!(report.failure_count(), 0);
//! ```

pub mod backend;
pub mod catalog;
pub mod config;
pub mod report;
pub mod session;
pub mod walker;

// Re-export catalog types
pub use catalog::{Catalog, CatalogError, CatalogResult, MenuNode};

// Re-export report types
pub use report::{Report, RunStatus, VisitOutcome, VisitStatus};

// Re-export backend trait and implementations
pub use backend::{
    ActivateError, AutomationBackend, BackError, BackendCall, MockBackend, WebDriverBackend,
    WebDriverConfig, WebDriverError,
};

// Re-export the traversal engine
pub use walker::{run_walk, WalkerConfig};

// Re-export session management
pub use session::{cleanup_old_sessions, list_sessions, Session};
