//! Types for traversal run results.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Result of one node activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    Success,
    Failure,
}

/// The recorded result of attempting to activate one menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitOutcome {
    /// Name of the entry that was activated
    pub node: String,

    /// Parent entry name (None for top-level entries)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether the activation succeeded
    pub status: VisitStatus,

    /// Underlying error detail (present iff status is Failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VisitOutcome {
    /// Record a successful activation
    pub fn success(node: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            node: node.into(),
            parent: parent.map(str::to_string),
            status: VisitStatus::Success,
            detail: None,
        }
    }

    /// Record a failed activation with its error detail
    pub fn failure(node: impl Into<String>, parent: Option<&str>, detail: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            parent: parent.map(str::to_string),
            status: VisitStatus::Failure,
            detail: Some(detail.into()),
        }
    }

    /// Whether this outcome is for a top-level entry
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether the activation succeeded
    pub fn is_success(&self) -> bool {
        self.status == VisitStatus::Success
    }
}

/// Derived classification of a whole run.
///
/// Run success is defined by top-level outcomes only; child failures are
/// recorded but do not fail the run. The caller decides whether
/// `PassedWithWarnings` counts as acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every visited entry activated successfully
    Passed,

    /// All top-level entries passed, but one or more children failed
    PassedWithWarnings,

    /// At least one top-level entry failed activation
    Failed,

    /// Back navigation failed and the run was cut short
    Fatal,
}

/// Ordered record of every activation attempt in one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Outcomes in visit order
    pub outcomes: Vec<VisitOutcome>,

    /// Detail of the back-navigation error that aborted the run, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome
    pub fn record(&mut self, outcome: VisitOutcome) {
        self.outcomes.push(outcome);
    }

    /// Flag the run as aborted by a back-navigation failure
    pub fn mark_fatal(&mut self, detail: impl Into<String>) {
        self.fatal = Some(detail.into());
    }

    /// Whether the run was cut short by a back-navigation failure
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[VisitOutcome] {
        &self.outcomes
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    /// Derive the overall classification of the run
    pub fn overall(&self) -> RunStatus {
        if self.is_fatal() {
            return RunStatus::Fatal;
        }
        let top_level_failed = self
            .outcomes
            .iter()
            .any(|o| o.is_top_level() && !o.is_success());
        if top_level_failed {
            return RunStatus::Failed;
        }
        if self.failure_count() > 0 {
            RunStatus::PassedWithWarnings
        } else {
            RunStatus::Passed
        }
    }

    /// Render a human-readable summary of the run
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let marker = match outcome.status {
                VisitStatus::Success => "ok  ",
                VisitStatus::Failure => "FAIL",
            };
            let location = match &outcome.parent {
                Some(parent) => format!("{} > {}", parent, outcome.node),
                None => outcome.node.clone(),
            };
            let _ = write!(out, "  {} {}", marker, location);
            if let Some(detail) = &outcome.detail {
                let _ = write!(out, " ({})", detail);
            }
            out.push('\n');
        }
        if let Some(detail) = &self.fatal {
            let _ = writeln!(out, "  RUN ABORTED: {}", detail);
        }
        let _ = write!(
            out,
            "{:?}: {} visited, {} passed, {} failed",
            self.overall(),
            self.len(),
            self.success_count(),
            self.failure_count()
        );
        out
    }
}
