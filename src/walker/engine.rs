//! The traversal engine: a failure-isolated depth-2 walk over a menu catalog.
//!
//! Two failure policies apply, one per error class:
//! - activation failures (element not found, gesture error) are isolated to
//!   the node: the outcome is recorded and the walk continues with the next
//!   sibling or top-level entry;
//! - back-navigation failures are fatal to the whole run, because every
//!   subsequent lookup assumes the session is positioned on the parent
//!   screen. The partial report is still returned, flagged fatal.

use tracing::{error, info, warn};

use crate::backend::AutomationBackend;
use crate::catalog::Catalog;
use crate::report::{Report, VisitOutcome};
use crate::walker::types::WalkerConfig;

/// Walk the catalog against a live UI session.
///
/// Visits every top-level entry in catalog order, then every nested entry
/// beneath it, navigating back after each successful activation so siblings
/// are always looked up from their parent screen. Returns one outcome per
/// activation attempt.
pub fn run_walk(
    catalog: &Catalog,
    backend: &mut dyn AutomationBackend,
    config: &WalkerConfig,
) -> Report {
    let mut report = Report::new();
    info!(
        source = backend.source_type(),
        entries = catalog.top_level_count(),
        "starting menu walk"
    );

    for top in catalog.nodes() {
        settle(config);
        match backend.activate(&top.name, config.activate_timeout) {
            Ok(()) => {
                info!(node = %top.name, "activated");
                report.record(VisitOutcome::success(&top.name, None));
            }
            Err(e) => {
                // Activation is side-effect-free on failure: the session is
                // still on the root menu, so there is nothing to back out of
                // and the next top-level entry can be tried directly.
                warn!(node = %top.name, error = %e, "top-level activation failed");
                report.record(VisitOutcome::failure(&top.name, None, e.to_string()));
                continue;
            }
        }

        for child in &top.children {
            settle(config);
            match backend.activate(&child.name, config.activate_timeout) {
                Ok(()) => {
                    info!(node = %child.name, parent = %top.name, "activated");
                    report.record(VisitOutcome::success(&child.name, Some(&top.name)));
                    if let Err(e) = backend.navigate_back() {
                        error!(node = %child.name, error = %e, "back navigation failed, aborting run");
                        report.mark_fatal(format!("returning from '{}': {}", child.name, e));
                        return report;
                    }
                }
                Err(e) => {
                    // The screen never changed, so the remaining siblings are
                    // still reachable without a back gesture.
                    warn!(node = %child.name, parent = %top.name, error = %e, "activation failed");
                    report.record(VisitOutcome::failure(&child.name, Some(&top.name), e.to_string()));
                }
            }
        }

        settle(config);
        if let Err(e) = backend.navigate_back() {
            error!(node = %top.name, error = %e, "back navigation failed, aborting run");
            report.mark_fatal(format!("returning from '{}': {}", top.name, e));
            return report;
        }
    }

    info!(
        visited = report.len(),
        failures = report.failure_count(),
        status = ?report.overall(),
        "menu walk complete"
    );
    report
}

fn settle(config: &WalkerConfig) {
    if !config.pause_between.is_zero() {
        std::thread::sleep(config.pause_between);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, MockBackend};
    use crate::catalog::MenuNode;
    use crate::report::{RunStatus, VisitStatus};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn test_config() -> WalkerConfig {
        WalkerConfig {
            activate_timeout: Duration::from_millis(10),
            pause_between: Duration::ZERO,
        }
    }

    fn two_level_catalog() -> Catalog {
        Catalog::new(vec![
            MenuNode::with_children("A", ["A1", "A2"]),
            MenuNode::leaf("B"),
        ])
        .unwrap()
    }

    fn statuses(report: &Report) -> Vec<(&str, VisitStatus)> {
        report
            .outcomes()
            .iter()
            .map(|o| (o.node.as_str(), o.status))
            .collect()
    }

    #[test]
    fn test_all_success_visits_everything_in_order() {
        let mut backend = MockBackend::new();
        let report = run_walk(&two_level_catalog(), &mut backend, &test_config());

        assert_eq!(
            statuses(&report),
            vec![
                ("A", VisitStatus::Success),
                ("A1", VisitStatus::Success),
                ("A2", VisitStatus::Success),
                ("B", VisitStatus::Success),
            ]
        );
        assert_eq!(report.overall(), RunStatus::Passed);
        assert!(!report.is_fatal());

        // One activate per entry; one back per successful child plus one per
        // successfully-activated top-level entry.
        assert_eq!(backend.activate_count(), 4);
        assert_eq!(backend.back_count(), 4);
        assert_eq!(backend.activated_names(), vec!["A", "A1", "A2", "B"]);
    }

    #[test]
    fn test_call_counts_scale_with_catalog() {
        let catalog = Catalog::new(vec![
            MenuNode::with_children("A", ["A1", "A2", "A3"]),
            MenuNode::with_children("B", ["B1"]),
            MenuNode::leaf("C"),
        ])
        .unwrap();
        let mut backend = MockBackend::new();
        let report = run_walk(&catalog, &mut backend, &test_config());

        // N = 3 top-level, sum(k) = 4 children.
        assert_eq!(backend.activate_count(), 7);
        assert_eq!(backend.back_count(), 7);
        assert_eq!(report.len(), 7);
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_runs_are_idempotent() {
        let catalog = two_level_catalog();
        let mut first = MockBackend::new().missing_element("A2");
        let mut second = MockBackend::new().missing_element("A2");

        let report_a = run_walk(&catalog, &mut first, &test_config());
        let report_b = run_walk(&catalog, &mut second, &test_config());

        assert_eq!(report_a.outcomes(), report_b.outcomes());
        assert_eq!(first.calls(), second.calls());
    }

    #[test]
    fn test_child_failure_is_isolated() {
        let mut backend = MockBackend::new().missing_element("A1");
        let report = run_walk(&two_level_catalog(), &mut backend, &test_config());

        assert_eq!(
            statuses(&report),
            vec![
                ("A", VisitStatus::Success),
                ("A1", VisitStatus::Failure),
                ("A2", VisitStatus::Success),
                ("B", VisitStatus::Success),
            ]
        );
        // Child failure does not fail the run.
        assert_eq!(report.overall(), RunStatus::PassedWithWarnings);

        let failure = &report.outcomes()[1];
        assert_eq!(failure.parent.as_deref(), Some("A"));
        assert!(failure.detail.as_deref().unwrap().contains("A1"));
    }

    #[test]
    fn test_sibling_children_still_visited_after_failure() {
        let catalog = Catalog::new(vec![MenuNode::with_children(
            "Top",
            ["c1", "c2", "c3", "c4"],
        )])
        .unwrap();
        let mut backend = MockBackend::new().missing_element("c2");
        let report = run_walk(&catalog, &mut backend, &test_config());

        // All four children attempted despite c2 failing.
        assert_eq!(
            backend.activated_names(),
            vec!["Top", "c1", "c2", "c3", "c4"]
        );
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn test_no_back_after_failed_child_activation() {
        let mut backend = MockBackend::new().missing_element("A1");
        run_walk(&two_level_catalog(), &mut backend, &test_config());

        // Backs: A2 (child), A (top), B (top). None for the failed A1.
        assert_eq!(backend.back_count(), 3);
        // The call right after the failed activate is the next sibling, not a back.
        let calls = backend.calls();
        let a1_pos = calls
            .iter()
            .position(|c| *c == BackendCall::Activate("A1".to_string()))
            .unwrap();
        assert_eq!(calls[a1_pos + 1], BackendCall::Activate("A2".to_string()));
    }

    #[test]
    fn test_top_level_failure_skips_subtree_and_back() {
        let mut backend = MockBackend::new().missing_element("A");
        let report = run_walk(&two_level_catalog(), &mut backend, &test_config());

        // A's children are never attempted and no back is issued for A.
        assert_eq!(backend.activated_names(), vec!["A", "B"]);
        assert_eq!(backend.back_count(), 1); // B's only
        assert_eq!(
            statuses(&report),
            vec![("A", VisitStatus::Failure), ("B", VisitStatus::Success)]
        );
        assert_eq!(report.overall(), RunStatus::Failed);
    }

    #[test]
    fn test_top_level_gesture_failure_fails_run() {
        let mut backend = MockBackend::new().fail_gesture_on("B");
        let report = run_walk(&two_level_catalog(), &mut backend, &test_config());

        assert_eq!(
            statuses(&report),
            vec![
                ("A", VisitStatus::Success),
                ("A1", VisitStatus::Success),
                ("A2", VisitStatus::Success),
                ("B", VisitStatus::Failure),
            ]
        );
        assert_eq!(report.overall(), RunStatus::Failed);
    }

    #[test]
    fn test_back_failure_aborts_run() {
        // First back is the one after A1 succeeds.
        let mut backend = MockBackend::new().fail_back_on_call(1);
        let report = run_walk(&two_level_catalog(), &mut backend, &test_config());

        assert_eq!(
            statuses(&report),
            vec![("A", VisitStatus::Success), ("A1", VisitStatus::Success)]
        );
        assert!(report.is_fatal());
        assert_eq!(report.overall(), RunStatus::Fatal);
        assert!(report.fatal.as_deref().unwrap().contains("A1"));

        // Nothing after the failed back was attempted.
        assert_eq!(backend.activated_names(), vec!["A", "A1"]);
    }

    #[test]
    fn test_back_failure_at_top_level_aborts_run() {
        let catalog = Catalog::new(vec![MenuNode::leaf("A"), MenuNode::leaf("B")]).unwrap();
        let mut backend = MockBackend::new().fail_back_on_call(1);
        let report = run_walk(&catalog, &mut backend, &test_config());

        assert_eq!(statuses(&report), vec![("A", VisitStatus::Success)]);
        assert!(report.is_fatal());
        assert_eq!(backend.activated_names(), vec!["A"]);
    }

    #[test]
    fn test_single_leaf_catalog() {
        let catalog = Catalog::new(vec![MenuNode::leaf("Only")]).unwrap();
        let mut backend = MockBackend::new();
        let report = run_walk(&catalog, &mut backend, &test_config());

        assert_eq!(report.len(), 1);
        assert_eq!(backend.activate_count(), 1);
        assert_eq!(backend.back_count(), 1);
        assert_eq!(report.overall(), RunStatus::Passed);
    }
}
