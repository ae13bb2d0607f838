//! Host reporting.
//!
//! The orchestrator talks to the host only through [`Reporter`]. The
//! [`ActionsReporter`] speaks the GitHub Actions workflow-command protocol.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    /// Marks the invocation as failed.
    fn fail(&self, message: &str);
    fn set_output(&self, name: &str, value: &str);
}

pub struct ActionsReporter {
    output_file: Option<PathBuf>,
    failed: AtomicBool,
}

impl ActionsReporter {
    /// Outputs go to the file named by `$GITHUB_OUTPUT`, when set.
    pub fn from_env() -> Self {
        let output_file = std::env::var_os("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self::new(output_file)
    }

    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            failed: AtomicBool::new(false),
        }
    }

    pub fn failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn append_output(&self, path: &Path, name: &str, value: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(output_entry(name, value).as_bytes())
    }
}

impl Reporter for ActionsReporter {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
        println!("::warning::{}", escape_data(message));
    }

    fn fail(&self, message: &str) {
        self.failed.store(true, Ordering::SeqCst);
        println!("::error::{}", escape_data(message));
    }

    fn set_output(&self, name: &str, value: &str) {
        match &self.output_file {
            Some(path) => {
                if let Err(e) = self.append_output(path, name, value) {
                    error!("Failed to write output {} to {}: {}", name, path.display(), e);
                }
            }
            None => info!("Output {} = {}", name, value),
        }
    }
}

/// Heredoc-style entry for the outputs file, safe for multi-line values.
fn output_entry(name: &str, value: &str) -> String {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Escape workflow-command data.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100% done\r\nnext"), "100%25 done%0D%0Anext");
    }

    #[test]
    fn test_output_entry_format() {
        let entry = output_entry("message_id", "300");
        let lines: Vec<_> = entry.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("message_id<<ghadelimiter_"));
        assert_eq!(lines[1], "300");
        assert_eq!(lines[0].trim_start_matches("message_id<<"), lines[2]);
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        let reporter = ActionsReporter::new(Some(path.clone()));

        reporter.set_output("message_id", "42");
        reporter.set_output("ok", "true");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("message_id<<"));
        assert!(content.contains("\n42\n"));
        assert!(content.contains("ok<<"));
        assert!(content.contains("\ntrue\n"));
        assert!(!reporter.failed());
    }

    #[test]
    fn test_fail_marks_reporter() {
        let reporter = ActionsReporter::new(None);
        reporter.info("working");
        reporter.warning("careful");
        assert!(!reporter.failed());

        reporter.fail("boom");
        assert!(reporter.failed());
    }
}
