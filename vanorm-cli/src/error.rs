// ============================================================================
// vanorm-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result Alias and Process Exit Codes
//
// Commands return CoreError directly. The process exit code is derived from
// either the fatal error or the batch summary:
//
// - 0   every discovered file was normalized (including zero files)
// - 1   fatal error before or during discovery
// - 2   at least one file failed
// - 130 the batch was cancelled

use vanorm_core::{BatchSummary, CoreResult};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FATAL: u8 = 1;
pub const EXIT_FILES_FAILED: u8 = 2;
pub const EXIT_CANCELLED: u8 = 130;

/// Maps a finished batch to the process exit code.
pub fn exit_code_for(summary: &BatchSummary) -> u8 {
    if summary.cancelled {
        EXIT_CANCELLED
    } else if summary.has_failures() {
        EXIT_FILES_FAILED
    } else {
        EXIT_SUCCESS
    }
}
