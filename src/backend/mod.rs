//! Automation backend abstraction.
//!
//! This module provides a unified interface over the live UI session:
//! - `WebDriverBackend` drives a real device through a WebDriver server
//! - `MockBackend` is a scripted in-process double for testing
//!
//! The contract the traversal engine depends on: `activate` must not alter
//! UI state when it fails, and `navigate_back` is always available once a
//! session exists.

pub mod mock;
pub mod webdriver;

pub use mock::{BackendCall, MockBackend};
pub use webdriver::{WebDriverBackend, WebDriverConfig, WebDriverError};

use std::time::Duration;

/// Trait for automation backends
///
/// Implementations resolve menu entries by accessible identifier and drive
/// the UI session one gesture at a time:
/// - `WebDriverBackend` for real devices over the WebDriver protocol
/// - `MockBackend` for tests with scripted outcomes
pub trait AutomationBackend {
    /// Locate an interactable element whose accessible identifier equals
    /// `name`, waiting up to `timeout`, and invoke its primary activation
    /// gesture. Must leave UI state untouched on failure.
    fn activate(&mut self, name: &str, timeout: Duration) -> Result<(), ActivateError>;

    /// Return the UI session to the logically previous screen
    fn navigate_back(&mut self) -> Result<(), BackError>;

    /// Get the source type identifier (e.g., "webdriver", "mock")
    fn source_type(&self) -> &str;
}

/// Errors from an activation attempt, both recovered locally by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivateError {
    /// No element with the identifier appeared within the wait window
    NotFound { name: String, waited: Duration },

    /// Element was located but the activation gesture failed
    Gesture(String),
}

impl std::fmt::Display for ActivateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivateError::NotFound { name, waited } => {
                write!(f, "element '{}' not found within {:?}", name, waited)
            }
            ActivateError::Gesture(msg) => write!(f, "activation gesture failed: {}", msg),
        }
    }
}

impl std::error::Error for ActivateError {}

/// Back navigation failed; the engine treats this as fatal to the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackError(pub String);

impl std::fmt::Display for BackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "back navigation failed: {}", self.0)
    }
}

impl std::error::Error for BackError {}
