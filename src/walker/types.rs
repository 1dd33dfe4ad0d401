use std::time::Duration;

use crate::config;

/// Configuration for one traversal run
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Wait window for each element activation
    pub activate_timeout: Duration,

    /// Settle delay inserted between traversal steps
    pub pause_between: Duration,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        let cfg = config::get();
        Self {
            activate_timeout: Duration::from_secs(cfg.walk.activate_timeout),
            pause_between: Duration::from_millis(cfg.walk.pause_between_ms),
        }
    }
}

impl WalkerConfig {
    /// Set the element wait window
    pub fn activate_timeout(mut self, timeout: Duration) -> Self {
        self.activate_timeout = timeout;
        self
    }

    /// Set the settle delay between gestures
    pub fn pause_between(mut self, pause: Duration) -> Self {
        self.pause_between = pause;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walker_config_builder() {
        let config = WalkerConfig::default()
            .activate_timeout(Duration::from_secs(5))
            .pause_between(Duration::from_millis(50));

        assert_eq!(config.activate_timeout, Duration::from_secs(5));
        assert_eq!(config.pause_between, Duration::from_millis(50));
    }
}
