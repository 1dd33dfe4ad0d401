//! WebDriver client backend.
//!
//! Drives a live UI session through a WebDriver-protocol server (Appium,
//! chromedriver, ...) using curl subprocesses, one request per gesture:
//! - element lookup by the `accessibility id` locator strategy, polled until
//!   found or the wait window elapses
//! - element click as the primary activation gesture
//! - the system-level back gesture for screen recovery
//!
//! # Configuration
//!
//! Server settings can be configured via environment variables:
//! - `MENU_WALKER_SERVER_URL`: WebDriver server URL
//! - `MENU_WALKER_CONNECT_TIMEOUT`: connection timeout (seconds)
//! - `MENU_WALKER_REQUEST_TIMEOUT`: per-request timeout (seconds)
//! - `MENU_WALKER_POLL_INTERVAL`: element lookup poll interval (ms)

use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{ActivateError, AutomationBackend, BackError};
use crate::config;

/// W3C WebDriver element identifier key
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy JSON wire protocol element key, still emitted by older Appium servers
const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Result type for WebDriver operations
pub type WebDriverResult<T> = Result<T, WebDriverError>;

/// Errors that can occur while talking to the WebDriver server
#[derive(Debug)]
pub enum WebDriverError {
    /// Failed to reach the server
    ConnectionFailed(String),
    /// Response body was not valid protocol JSON
    InvalidResponse(String),
    /// The server answered with a protocol-level error payload
    Protocol { error: String, message: String },
    /// IO error spawning the transport
    Io(std::io::Error),
}

impl std::fmt::Display for WebDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebDriverError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            WebDriverError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            WebDriverError::Protocol { error, message } => write!(f, "{}: {}", error, message),
            WebDriverError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for WebDriverError {}

impl From<std::io::Error> for WebDriverError {
    fn from(e: std::io::Error) -> Self {
        WebDriverError::Io(e)
    }
}

/// Configuration for the WebDriver client
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Server base URL (e.g. "http://127.0.0.1:4723")
    pub server_url: String,
    /// Timeout for establishing each connection (seconds)
    pub connect_timeout: u64,
    /// Timeout for a whole request (seconds)
    pub request_timeout: u64,
    /// Pause between element lookup attempts (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        let cfg = config::get();
        Self {
            server_url: cfg.server.url.clone(),
            connect_timeout: cfg.server.connect_timeout,
            request_timeout: cfg.server.request_timeout,
            poll_interval_ms: cfg.walk.poll_interval_ms,
        }
    }
}

impl WebDriverConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    pub fn connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout = seconds;
        self
    }

    pub fn request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout = seconds;
        self
    }

    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }
}

/// A connected WebDriver session implementing [`AutomationBackend`]
///
/// Session lifecycle is owned here: `connect` creates the session and
/// `disconnect` tears it down. The traversal engine only ever sees the
/// already-connected handle.
#[derive(Debug)]
pub struct WebDriverBackend {
    config: WebDriverConfig,
    session_id: String,
}

impl WebDriverBackend {
    /// Create a new session on the server with the given capabilities
    pub fn connect(
        config: WebDriverConfig,
        capabilities: &serde_json::Value,
    ) -> WebDriverResult<Self> {
        let payload = serde_json::json!({
            "capabilities": { "alwaysMatch": capabilities }
        });
        let url = format!("{}/session", config.server_url);
        let response = http_json(&config, "POST", &url, Some(&payload.to_string()))?;

        if let Some((error, message)) = protocol_error(&response) {
            return Err(WebDriverError::Protocol { error, message });
        }
        let session_id = session_id(&response).ok_or_else(|| {
            WebDriverError::InvalidResponse("no session id in response".to_string())
        })?;

        debug!(session = %session_id, server = %config.server_url, "session created");
        Ok(Self { config, session_id })
    }

    /// End the session on the server
    pub fn disconnect(&mut self) -> WebDriverResult<()> {
        let url = self.session_url("");
        let response = http_json(&self.config, "DELETE", &url, None)?;
        if let Some((error, message)) = protocol_error(&response) {
            return Err(WebDriverError::Protocol { error, message });
        }
        debug!(session = %self.session_id, "session ended");
        Ok(())
    }

    /// The server-assigned session id
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn session_url(&self, path: &str) -> String {
        format!(
            "{}/session/{}{}",
            self.config.server_url, self.session_id, path
        )
    }

    /// Look up an element by accessible identifier.
    /// Returns Ok(None) when the server reports `no such element`.
    fn find_element(&self, name: &str) -> WebDriverResult<Option<String>> {
        let payload = serde_json::json!({
            "using": "accessibility id",
            "value": name,
        });
        let url = self.session_url("/element");
        let response = http_json(&self.config, "POST", &url, Some(&payload.to_string()))?;

        if let Some((error, message)) = protocol_error(&response) {
            if error == "no such element" {
                return Ok(None);
            }
            return Err(WebDriverError::Protocol { error, message });
        }
        match element_ref(&response) {
            Some(element) => Ok(Some(element)),
            None => Err(WebDriverError::InvalidResponse(
                "no element reference in response".to_string(),
            )),
        }
    }

    /// Click a previously located element
    fn click(&self, element: &str) -> WebDriverResult<()> {
        let url = self.session_url(&format!("/element/{}/click", element));
        let response = http_json(&self.config, "POST", &url, Some("{}"))?;
        if let Some((error, message)) = protocol_error(&response) {
            return Err(WebDriverError::Protocol { error, message });
        }
        Ok(())
    }
}

impl AutomationBackend for WebDriverBackend {
    fn activate(&mut self, name: &str, timeout: Duration) -> Result<(), ActivateError> {
        let deadline = Instant::now() + timeout;
        let poll = Duration::from_millis(self.config.poll_interval_ms.max(1));

        // Explicit wait: poll the lookup until found or the window closes.
        // Lookup misses leave UI state untouched, so timing out here is safe
        // to recover from.
        loop {
            match self.find_element(name) {
                Ok(Some(element)) => {
                    return self
                        .click(&element)
                        .map_err(|e| ActivateError::Gesture(e.to_string()));
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        return Err(ActivateError::NotFound {
                            name: name.to_string(),
                            waited: timeout,
                        });
                    }
                    thread::sleep(poll.min(deadline.saturating_duration_since(Instant::now())));
                }
                Err(e) => return Err(ActivateError::Gesture(e.to_string())),
            }
        }
    }

    fn navigate_back(&mut self) -> Result<(), BackError> {
        let url = self.session_url("/back");
        let response = http_json(&self.config, "POST", &url, Some("{}"))
            .map_err(|e| BackError(e.to_string()))?;
        if let Some((error, message)) = protocol_error(&response) {
            return Err(BackError(format!("{}: {}", error, message)));
        }
        Ok(())
    }

    fn source_type(&self) -> &str {
        "webdriver"
    }
}

/// Issue one HTTP request via curl and parse the JSON body
fn http_json(
    config: &WebDriverConfig,
    method: &str,
    url: &str,
    body: Option<&str>,
) -> WebDriverResult<serde_json::Value> {
    let mut cmd = Command::new("curl");
    cmd.args([
        "-s",
        "-X",
        method,
        url,
        "-H",
        "Content-Type: application/json",
        "--connect-timeout",
        &config.connect_timeout.to_string(),
        "--max-time",
        &config.request_timeout.to_string(),
    ]);
    if let Some(body) = body {
        cmd.args(["-d", body]);
    }

    let output = cmd.output()?;
    if !output.status.success() {
        return Err(WebDriverError::ConnectionFailed(format!(
            "curl exited with {} for {} {}",
            output.status, method, url
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.trim().is_empty() {
        // Some servers answer DELETE with an empty body.
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&stdout)
        .map_err(|e| WebDriverError::InvalidResponse(format!("{}: {}", e, stdout.trim())))
}

/// Extract a protocol error payload if the response carries one
fn protocol_error(response: &serde_json::Value) -> Option<(String, String)> {
    let value = response.get("value")?;
    let error = value.get("error")?.as_str()?.to_string();
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("")
        .to_string();
    Some((error, message))
}

/// Extract the session id from a new-session response
fn session_id(response: &serde_json::Value) -> Option<String> {
    // W3C puts it under value.sessionId; legacy servers at the top level.
    response["value"]["sessionId"]
        .as_str()
        .or_else(|| response["sessionId"].as_str())
        .map(str::to_string)
}

/// Extract an element reference from a find-element response
fn element_ref(response: &serde_json::Value) -> Option<String> {
    let value = response.get("value")?;
    value
        .get(W3C_ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
