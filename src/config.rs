//! Configuration management with environment variable support.
//!
//! Centralized configuration for menu-walker, supporting:
//! - Environment variables for all configurable values
//! - Sensible defaults
//! - Settings structs per concern, consumed by the builders
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MENU_WALKER_SERVER_URL` | WebDriver server URL | `http://127.0.0.1:4723` |
//! | `MENU_WALKER_CONNECT_TIMEOUT` | Connection timeout in seconds | `10` |
//! | `MENU_WALKER_REQUEST_TIMEOUT` | Per-request timeout in seconds | `30` |
//! | `MENU_WALKER_ACTIVATE_TIMEOUT` | Element wait window in seconds | `20` |
//! | `MENU_WALKER_POLL_INTERVAL` | Element lookup poll interval (ms) | `500` |
//! | `MENU_WALKER_PAUSE_BETWEEN` | Settle delay between nodes (ms) | `0` |
//! | `MENU_WALKER_SESSION_DIR` | Base directory for run artifacts | `/tmp/menu-walker` |

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default WebDriver server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723";

/// Default connection timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default element wait window (seconds)
pub const DEFAULT_ACTIVATE_TIMEOUT: u64 = 20;

/// Default element lookup poll interval (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default settle delay between nodes (milliseconds)
pub const DEFAULT_PAUSE_BETWEEN_MS: u64 = 0;

/// Default session base directory
pub const DEFAULT_SESSION_DIR: &str = "/tmp/menu-walker";

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the WebDriver server URL
pub const ENV_SERVER_URL: &str = "MENU_WALKER_SERVER_URL";

/// Environment variable for the connection timeout
pub const ENV_CONNECT_TIMEOUT: &str = "MENU_WALKER_CONNECT_TIMEOUT";

/// Environment variable for the per-request timeout
pub const ENV_REQUEST_TIMEOUT: &str = "MENU_WALKER_REQUEST_TIMEOUT";

/// Environment variable for the element wait window
pub const ENV_ACTIVATE_TIMEOUT: &str = "MENU_WALKER_ACTIVATE_TIMEOUT";

/// Environment variable for the poll interval
pub const ENV_POLL_INTERVAL: &str = "MENU_WALKER_POLL_INTERVAL";

/// Environment variable for the settle delay
pub const ENV_PAUSE_BETWEEN: &str = "MENU_WALKER_PAUSE_BETWEEN";

/// Environment variable for the session directory
pub const ENV_SESSION_DIR: &str = "MENU_WALKER_SESSION_DIR";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for menu-walker
#[derive(Debug, Clone)]
pub struct Config {
    /// WebDriver server configuration
    pub server: ServerSettings,
    /// Traversal configuration
    pub walk: WalkSettings,
    /// Session configuration
    pub session: SessionSettings,
}

/// WebDriver server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Server base URL
    pub url: String,
    /// Connection timeout (seconds)
    pub connect_timeout: u64,
    /// Per-request timeout (seconds)
    pub request_timeout: u64,
}

/// Traversal settings
#[derive(Debug, Clone)]
pub struct WalkSettings {
    /// Element wait window per activation (seconds)
    pub activate_timeout: u64,
    /// Element lookup poll interval (milliseconds)
    pub poll_interval_ms: u64,
    /// Settle delay between nodes (milliseconds)
    pub pause_between_ms: u64,
}

/// Session-related settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Base directory for run artifact storage
    pub base_dir: String,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings::from_env(),
            walk: WalkSettings::from_env(),
            session: SessionSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            server: ServerSettings::defaults(),
            walk: WalkSettings::defaults(),
            session: SessionSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ServerSettings {
    /// Create server settings from environment variables
    pub fn from_env() -> Self {
        Self {
            url: env::var(ENV_SERVER_URL).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
            connect_timeout: env_u64(ENV_CONNECT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT),
            request_timeout: env_u64(ENV_REQUEST_TIMEOUT, DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Create server settings with defaults
    pub fn defaults() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl WalkSettings {
    /// Create traversal settings from environment variables
    pub fn from_env() -> Self {
        Self {
            activate_timeout: env_u64(ENV_ACTIVATE_TIMEOUT, DEFAULT_ACTIVATE_TIMEOUT),
            poll_interval_ms: env_u64(ENV_POLL_INTERVAL, DEFAULT_POLL_INTERVAL_MS),
            pause_between_ms: env_u64(ENV_PAUSE_BETWEEN, DEFAULT_PAUSE_BETWEEN_MS),
        }
    }

    /// Create traversal settings with defaults
    pub fn defaults() -> Self {
        Self {
            activate_timeout: DEFAULT_ACTIVATE_TIMEOUT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            pause_between_ms: DEFAULT_PAUSE_BETWEEN_MS,
        }
    }
}

impl SessionSettings {
    /// Create session settings from environment variables
    pub fn from_env() -> Self {
        Self {
            base_dir: env::var(ENV_SESSION_DIR).unwrap_or_else(|_| DEFAULT_SESSION_DIR.to_string()),
        }
    }

    /// Create session settings with defaults
    pub fn defaults() -> Self {
        Self {
            base_dir: DEFAULT_SESSION_DIR.to_string(),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Get the WebDriver server URL (convenience function)
pub fn server_url() -> String {
    get().server.url.clone()
}

/// Get the session base directory (convenience function)
pub fn session_base_dir() -> String {
    get().session.base_dir.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.server.url, DEFAULT_SERVER_URL);
        assert_eq!(config.walk.activate_timeout, DEFAULT_ACTIVATE_TIMEOUT);
        assert_eq!(config.walk.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.session.base_dir, DEFAULT_SESSION_DIR);
    }

    #[test]
    fn test_env_u64_fallback() {
        assert_eq!(env_u64("MENU_WALKER_NO_SUCH_VAR", 7), 7);
    }
}
