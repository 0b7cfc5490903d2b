// ============================================================================
// vanorm-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for vanorm-core
//
// This module defines the error types used throughout the vanorm-core library.
// It separates batch-fatal errors (nothing can be processed) from file-scoped
// errors that the batch loop records and moves past.
//
// KEY COMPONENTS:
// - CoreError: Main error enum for all library operations
// - CoreResult: Convenience type alias for Result<T, CoreError>
// - Helper functions for the process plumbing errors
//
// USAGE:
// ```rust
// fn some_function() -> CoreResult<()> {
//     let size = std::fs::metadata("video.mkv")?.len();
//     Ok(())
// }
// ```

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by vanorm-core.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Discovery / startup (fatal) ----
    /// The discovery root does not exist or is not a directory.
    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The ffmpeg binary could not be located.
    #[error("ffmpeg executable not found: {0}")]
    EngineNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    // ---- Normalization (file-scoped) ----
    /// ffmpeg exited with a non-zero status while normalizing.
    #[error("ffmpeg failed for {} ({status}): {detail}", .path.display())]
    EngineFailure {
        path: PathBuf,
        status: ExitStatus,
        detail: String,
    },

    #[error("ffmpeg timed out after {}s for {}", .limit.as_secs(), .path.display())]
    Timeout { path: PathBuf, limit: Duration },

    #[error("Normalization cancelled for {}", .0.display())]
    Cancelled(PathBuf),

    // ---- Process plumbing ----
    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{0} exited with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    // ---- Filesystem ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory traversal error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Path error: {0}")]
    PathError(String),
}

impl CoreError {
    /// Returns true for errors that stop the whole batch rather than one file.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::NotFound(_)
                | CoreError::EngineNotFound(_)
                | CoreError::Config(_)
                | CoreError::Walkdir(_)
        )
    }
}

/// Result type for vanorm-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandWait` error for a tool whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a `CommandFailed` error for a tool that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}
