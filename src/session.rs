//! Session management for organized run-artifact handling.
//!
//! Provides centralized management of walk runs with:
//! - Unique run directories under a global temp location
//! - Automatic cleanup unless explicitly preserved
//! - Report artifacts (JSON + text summary) per run

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config;
use crate::report::Report;

/// A walk run with organized file management
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session ID
    pub id: String,
    /// Root directory for this session
    pub dir: PathBuf,
    /// Whether to keep files after session ends
    pub keep: bool,
}

impl Session {
    /// Create a new session with a unique ID
    pub fn new() -> Self {
        let id = generate_session_id();
        let dir = PathBuf::from(config::session_base_dir()).join(&id);

        Self {
            id,
            dir,
            keep: false,
        }
    }

    /// Create a session with a specific name/prefix
    pub fn with_name(name: &str) -> Self {
        let timestamp = generate_timestamp_suffix();
        let id = format!("{}_{}", sanitize_name(name), timestamp);
        let dir = PathBuf::from(config::session_base_dir()).join(&id);

        Self {
            id,
            dir,
            keep: false,
        }
    }

    /// Create a session in a specific directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let id = dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(generate_session_id);

        Self {
            id,
            dir,
            keep: true, // User-specified directories are kept by default
        }
    }

    /// Set whether to keep files after session ends
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    /// Initialize the session directory
    pub fn init(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write session metadata
        let metadata = serde_json::json!({
            "id": self.id,
            "created": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_path = self.dir.join(".session.json");
        fs::write(metadata_path, serde_json::to_string_pretty(&metadata)?)?;

        Ok(())
    }

    /// Path of the machine-readable report artifact
    pub fn report_path(&self) -> PathBuf {
        self.dir.join("report.json")
    }

    /// Path of the human-readable summary artifact
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join("summary.txt")
    }

    /// Write both report artifacts for a completed (or aborted) run
    pub fn write_report(&self, report: &Report) -> std::io::Result<()> {
        fs::write(self.report_path(), serde_json::to_string_pretty(report)?)?;
        fs::write(self.summary_path(), report.render_text())?;
        Ok(())
    }

    /// Clean up the session directory
    pub fn cleanup(&self) -> std::io::Result<()> {
        if self.dir.exists() && !self.keep {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }
}

/// Generate a unique session ID
fn generate_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let pid = std::process::id();
    format!("run_{}_{}", timestamp, pid)
}

/// Generate a timestamp suffix
fn generate_timestamp_suffix() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Sanitize a name for use in filenames
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

/// Clean up old sessions older than the specified duration
pub fn cleanup_old_sessions(max_age: std::time::Duration) -> std::io::Result<usize> {
    let base = PathBuf::from(config::session_base_dir());
    if !base.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let mut cleaned = 0;

    for entry in fs::read_dir(&base)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            if let Ok(metadata) = entry.metadata() {
                if let Ok(modified) = metadata.modified() {
                    if let Ok(age) = now.duration_since(modified) {
                        if age > max_age && fs::remove_dir_all(&path).is_ok() {
                            cleaned += 1;
                        }
                    }
                }
            }
        }
    }

    Ok(cleaned)
}

/// List all existing sessions
pub fn list_sessions() -> std::io::Result<Vec<PathBuf>> {
    let base = PathBuf::from(config::session_base_dir());
    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in fs::read_dir(&base)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            sessions.push(path);
        }
    }
    sessions.sort();
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::VisitOutcome;

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert!(session.id.starts_with("run_"));
        assert!(!session.keep);
    }

    #[test]
    fn test_session_with_name() {
        let session = Session::with_name("menu walk");
        assert!(session.id.starts_with("menu_walk_"));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("hello world"), "hello_world");
        assert_eq!(sanitize_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_name("walk-1"), "walk-1");
    }

    #[test]
    fn test_write_report_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let session = Session::in_dir(tmp.path().join("run"));
        session.init().unwrap();

        let mut report = Report::new();
        report.record(VisitOutcome::success("A", None));
        report.record(VisitOutcome::failure("A1", Some("A"), "not found"));
        session.write_report(&report).unwrap();

        assert!(session.report_path().exists());
        assert!(session.summary_path().exists());

        let json = std::fs::read_to_string(session.report_path()).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);

        let summary = std::fs::read_to_string(session.summary_path()).unwrap();
        assert!(summary.contains("FAIL A > A1"));
    }

    #[test]
    fn test_cleanup_removes_unkept_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("run_x");
        let session = Session::in_dir(&dir).keep(false);
        session.init().unwrap();
        assert!(dir.exists());
        session.cleanup().unwrap();
        assert!(!dir.exists());
    }
}
