//! Duration probing with a container-level fallback.
//!
//! The first-video-stream duration is cheap and usually present. Some
//! containers (notably MKV) leave it unset, so the container duration is
//! queried once when the stream answer is missing or unparseable. Duration
//! is informational only: when neither answer parses, the result is `0.0`.

use crate::external::FfprobeExecutor;

use std::path::Path;

/// Sentinel returned when the duration cannot be determined.
pub const UNKNOWN_DURATION: f64 = 0.0;

/// Parses a bare ffprobe value such as `"123.456000\n"`.
///
/// Returns `None` for empty output, `N/A`, negative or non-finite values.
#[must_use]
pub fn parse_probe_output(output: &str) -> Option<f64> {
    output
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}

/// Determines the duration of `input_path` in seconds.
///
/// Never fails; returns [`UNKNOWN_DURATION`] when both queries are unusable.
pub fn probe_duration<P: FfprobeExecutor + ?Sized>(ffprobe: &P, input_path: &Path) -> f64 {
    match ffprobe.stream_duration(input_path) {
        Ok(output) => {
            if let Some(secs) = parse_probe_output(&output) {
                return secs;
            }
            log::debug!(
                "Stream duration unavailable for {} (got {:?}), trying container duration",
                input_path.display(),
                output.trim()
            );
        }
        Err(e) => {
            log::warn!(
                "Stream duration probe failed for {}: {}. Trying container duration",
                input_path.display(),
                e
            );
        }
    }

    match ffprobe.format_duration(input_path) {
        Ok(output) => parse_probe_output(&output).unwrap_or_else(|| {
            log::warn!("Could not determine duration of {}", input_path.display());
            UNKNOWN_DURATION
        }),
        Err(e) => {
            log::warn!(
                "Container duration probe failed for {}: {}",
                input_path.display(),
                e
            );
            UNKNOWN_DURATION
        }
    }
}
