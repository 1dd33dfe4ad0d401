pub mod engine;
pub mod types;

pub use engine::run_walk;
pub use types::WalkerConfig;
