use crate::domain::HistResult;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Text `cprnc` prints when two files hold bit-for-bit identical fields.
pub const IDENTICAL_MARKER: &str = "files seem to be IDENTICAL";

/// Verdict and captured output of comparing one pair of history files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitComparison {
    pub identical: bool,
    pub output: String,
}

impl BitComparison {
    pub fn new(identical: bool, output: impl Into<String>) -> Self {
        Self {
            identical,
            output: output.into(),
        }
    }
}

/// Bit-for-bit comparison of two history files.
///
/// `log_dir` is where an implementation may leave a per-pair log.
pub trait BitComparator {
    fn compare(&self, file1: &Path, file2: &Path, log_dir: &Path) -> HistResult<BitComparison>;
}

#[derive(Debug, thiserror::Error)]
pub enum ComparatorError {
    #[error("failed to execute comparator '{}': {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write comparator log '{}': {source}", .path.display())]
    WriteLog {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Runs the external `cprnc` tool as `<executable> -m <file1> <file2>`.
///
/// Combined stdout and stderr are written to `<log_dir>/<basename of file1>.cprnc.out`.
/// The call blocks until the tool exits; there is no timeout. A tool that
/// cannot be started, or a log that cannot be written, never aborts the
/// comparison: the first yields a non-identical verdict carrying the launch
/// error, the second is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cprnc {
    executable: PathBuf,
}

impl Cprnc {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

}

impl BitComparator for Cprnc {
    fn compare(&self, file1: &Path, file2: &Path, log_dir: &Path) -> HistResult<BitComparison> {
        debug!(
            executable = %self.executable.display(),
            file1 = %file1.display(),
            file2 = %file2.display(),
            "running cprnc"
        );
        let (identical, text) = match Command::new(&self.executable)
            .arg("-m")
            .arg(file1)
            .arg(file2)
            .output()
        {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                (cprnc_verdict(output.status.success(), &text), text)
            }
            Err(source) => {
                let error = ComparatorError::Spawn {
                    executable: self.executable.clone(),
                    source,
                };
                warn!(%error, "comparator did not run");
                (false, error.to_string())
            }
        };

        let log_path = cprnc_log_path(file1, log_dir);
        if let Err(source) = fs::write(&log_path, &text) {
            let error = ComparatorError::WriteLog {
                path: log_path,
                source,
            };
            warn!(%error, "comparator log not written");
        }

        Ok(BitComparison::new(identical, text))
    }
}

pub fn cprnc_log_path(file1: &Path, log_dir: &Path) -> PathBuf {
    let basename = file1
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    log_dir.join(format!("{}.cprnc.out", basename))
}

/// Files match only when the tool exited cleanly and reported them identical.
pub fn cprnc_verdict(exit_success: bool, output: &str) -> bool {
    exit_success && output.contains(IDENTICAL_MARKER)
}
