//! Utility functions for formatting, file sizes and path manipulation.
//!
//! This module provides general-purpose helpers used throughout the
//! vanorm-core library: megabyte conversion, HH:MM:SS formatting, the
//! throughput calculation and the output naming rule.

use crate::error::{CoreError, CoreResult};
use crate::external::FileMetadataProvider;

use std::path::{Path, PathBuf};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Converts a byte count to megabytes (MiB).
#[must_use]
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MEGABYTE
}

/// Returns the size of the file at `path` in megabytes.
pub fn get_file_size_mb<M: FileMetadataProvider + ?Sized>(
    metadata_provider: &M,
    path: &Path,
) -> CoreResult<f64> {
    Ok(bytes_to_megabytes(metadata_provider.get_size(path)?))
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats a megabyte value with two decimals (e.g., "12.50 MB").
#[must_use]
pub fn format_megabytes(megabytes: f64) -> String {
    format!("{megabytes:.2} MB")
}

/// Average throughput in MB/s. Returns 0 when no time has elapsed.
#[must_use]
pub fn calculate_average_speed(input_size_mb: f64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        input_size_mb / elapsed_secs
    } else {
        0.0
    }
}

/// Builds the output path for an input file: same directory, prefixed name.
///
/// `/videos/show/ep1.mkv` with prefix `normalized_` becomes
/// `/videos/show/normalized_ep1.mkv`.
pub fn output_path_for(input: &Path, prefix: &str) -> CoreResult<PathBuf> {
    let file_name = input.file_name().ok_or_else(|| {
        CoreError::PathError(format!("Failed to get filename for {}", input.display()))
    })?;

    let mut output_name = std::ffi::OsString::from(prefix);
    output_name.push(file_name);

    Ok(input.with_file_name(output_name))
}

/// Returns true for ffmpeg stderr lines that carry encode progress.
#[must_use]
pub fn is_progress_line(line: &str) -> bool {
    line.contains("frame=") || line.contains("time=")
}
