//! Scripted in-process backend for testing.

use std::collections::HashSet;
use std::time::Duration;

use super::{ActivateError, AutomationBackend, BackError};

/// One call observed by the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Activate(String),
    NavigateBack,
}

/// A scripted automation backend for testing
///
/// Every call is recorded in an ordered log, and failures can be injected
/// per entry name or per back-navigation call index:
/// - `missing_element()` - activation fails as element-not-found
/// - `fail_gesture_on()` - activation fails after the element is "located"
/// - `fail_back_on_call()` - the N-th `navigate_back` (1-based) fails
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    missing: HashSet<String>,
    gesture_failures: HashSet<String>,
    fail_back_on: Option<usize>,
    calls: Vec<BackendCall>,
    backs_seen: usize,
}

impl MockBackend {
    /// Create a backend that succeeds on every call
    pub fn new() -> Self {
        Self::default()
    }

    /// Make activation of `name` fail as element-not-found
    pub fn missing_element(mut self, name: impl Into<String>) -> Self {
        self.missing.insert(name.into());
        self
    }

    /// Make activation of `name` fail at the gesture stage
    pub fn fail_gesture_on(mut self, name: impl Into<String>) -> Self {
        self.gesture_failures.insert(name.into());
        self
    }

    /// Make the N-th `navigate_back` call fail (1-based)
    pub fn fail_back_on_call(mut self, n: usize) -> Self {
        self.fail_back_on = Some(n);
        self
    }

    /// All calls observed so far, in order
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Number of `activate` calls observed
    pub fn activate_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Activate(_)))
            .count()
    }

    /// Number of `navigate_back` calls observed
    pub fn back_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::NavigateBack))
            .count()
    }

    /// Names passed to `activate`, in call order
    pub fn activated_names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Activate(name) => Some(name.as_str()),
                BackendCall::NavigateBack => None,
            })
            .collect()
    }

    /// Clear the call log, keeping the scripted failures
    pub fn reset_log(&mut self) {
        self.calls.clear();
        self.backs_seen = 0;
    }
}

impl AutomationBackend for MockBackend {
    fn activate(&mut self, name: &str, timeout: Duration) -> Result<(), ActivateError> {
        self.calls.push(BackendCall::Activate(name.to_string()));

        if self.missing.contains(name) {
            return Err(ActivateError::NotFound {
                name: name.to_string(),
                waited: timeout,
            });
        }
        if self.gesture_failures.contains(name) {
            return Err(ActivateError::Gesture(format!(
                "scripted gesture failure on '{}'",
                name
            )));
        }
        Ok(())
    }

    fn navigate_back(&mut self) -> Result<(), BackError> {
        self.calls.push(BackendCall::NavigateBack);
        self.backs_seen += 1;

        if self.fail_back_on == Some(self.backs_seen) {
            return Err(BackError(format!(
                "scripted back failure on call {}",
                self.backs_seen
            )));
        }
        Ok(())
    }

    fn source_type(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[test]
    fn test_mock_records_calls_in_order() {
        let mut backend = MockBackend::new();
        backend.activate("A", TIMEOUT).unwrap();
        backend.navigate_back().unwrap();
        backend.activate("B", TIMEOUT).unwrap();

        assert_eq!(
            backend.calls(),
            &[
                BackendCall::Activate("A".to_string()),
                BackendCall::NavigateBack,
                BackendCall::Activate("B".to_string()),
            ]
        );
        assert_eq!(backend.activate_count(), 2);
        assert_eq!(backend.back_count(), 1);
        assert_eq!(backend.activated_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_mock_missing_element() {
        let mut backend = MockBackend::new().missing_element("Gone");
        let err = backend.activate("Gone", TIMEOUT).unwrap_err();
        assert!(matches!(err, ActivateError::NotFound { .. }));
        assert!(backend.activate("Here", TIMEOUT).is_ok());
    }

    #[test]
    fn test_mock_gesture_failure() {
        let mut backend = MockBackend::new().fail_gesture_on("Broken");
        let err = backend.activate("Broken", TIMEOUT).unwrap_err();
        assert!(matches!(err, ActivateError::Gesture(_)));
    }

    #[test]
    fn test_mock_fail_back_on_nth_call() {
        let mut backend = MockBackend::new().fail_back_on_call(2);
        assert!(backend.navigate_back().is_ok());
        assert!(backend.navigate_back().is_err());
        // Only the scripted call fails.
        assert!(backend.navigate_back().is_ok());
    }
}
