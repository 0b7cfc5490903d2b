// ============================================================================
// vanorm-core/src/reporting/mod.rs
// ============================================================================
//
// REPORTING: Batch Summary and Per-File Failure Records
//
// The batch loop converts every per-file error into a FileFailure and every
// success into a NormalizeResult; BatchSummary aggregates both and is what
// the batch returns. It serializes to JSON for machine-readable output.

use crate::NormalizeResult;
use crate::error::CoreError;

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Why a single file was not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// ffmpeg exited with a non-zero status
    EngineFailure,
    /// The per-file deadline elapsed
    Timeout,
    /// The batch was cancelled while this file was running
    Cancelled,
    /// Anything else (spawn failures, I/O errors reading sizes, ...)
    Unexpected,
}

impl From<&CoreError> for FailureKind {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::EngineFailure { .. } => FailureKind::EngineFailure,
            CoreError::Timeout { .. } => FailureKind::Timeout,
            CoreError::Cancelled(_) => FailureKind::Cancelled,
            _ => FailureKind::Unexpected,
        }
    }
}

/// A file-scoped failure recorded by the batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub detail: String,
}

impl FileFailure {
    pub fn from_error(path: PathBuf, err: &CoreError) -> Self {
        let detail = match err {
            CoreError::EngineFailure { detail, .. } => detail.clone(),
            other => other.to_string(),
        };
        Self {
            path,
            kind: FailureKind::from(err),
            detail,
        }
    }
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Number of files discovered
    pub total: usize,
    pub succeeded: Vec<NormalizeResult>,
    pub failed: Vec<FileFailure>,
    /// True when cancellation stopped the batch early
    pub cancelled: bool,
    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Files that were never attempted because the batch was cancelled.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.total
            .saturating_sub(self.succeeded_count() + self.failed_count())
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    #[must_use]
    pub fn total_input_mb(&self) -> f64 {
        self.succeeded.iter().map(|r| r.input_size_mb).sum()
    }

    #[must_use]
    pub fn total_output_mb(&self) -> f64 {
        self.succeeded.iter().map(|r| r.output_size_mb).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::exit_status;

    fn result(name: &str, input: f64, output: f64) -> NormalizeResult {
        NormalizeResult {
            path: PathBuf::from(name),
            output_path: PathBuf::from(format!("normalized_{name}")),
            duration_secs: 30.0,
            elapsed: Duration::from_secs(3),
            input_size_mb: input,
            output_size_mb: output,
            average_speed: input / 3.0,
        }
    }

    #[test]
    fn test_failure_kind_mapping() {
        let engine = CoreError::EngineFailure {
            path: PathBuf::from("a.mkv"),
            status: exit_status(1),
            detail: "Invalid data found when processing input".to_string(),
        };
        let failure = FileFailure::from_error(PathBuf::from("a.mkv"), &engine);
        assert_eq!(failure.kind, FailureKind::EngineFailure);
        assert_eq!(failure.detail, "Invalid data found when processing input");

        let cancelled = CoreError::Cancelled(PathBuf::from("a.mkv"));
        assert_eq!(FailureKind::from(&cancelled), FailureKind::Cancelled);

        let io = CoreError::Io(std::io::Error::other("disk gone"));
        let failure = FileFailure::from_error(PathBuf::from("a.mkv"), &io);
        assert_eq!(failure.kind, FailureKind::Unexpected);
        assert!(failure.detail.contains("disk gone"));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::new(4);
        summary.succeeded.push(result("a.mp4", 10.0, 9.5));
        summary.succeeded.push(result("b.mkv", 20.0, 19.0));
        summary.failed.push(FileFailure {
            path: PathBuf::from("c.avi"),
            kind: FailureKind::EngineFailure,
            detail: "boom".to_string(),
        });

        assert_eq!(summary.succeeded_count(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert!(summary.has_failures());
        assert_eq!(summary.total_input_mb(), 30.0);
        assert_eq!(summary.total_output_mb(), 28.5);
    }
}
