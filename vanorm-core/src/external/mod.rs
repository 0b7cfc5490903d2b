// ============================================================================
// vanorm-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg, ffprobe and the File System
//
// This module encapsulates interactions with the external command-line tools
// and file system metadata. Each interaction sits behind a trait so the
// processing code can be exercised with mocks.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: spawning and streaming ffmpeg
// - FfprobeExecutor: raw duration queries
// - FileMetadataProvider: file size lookups
// - resolve_engine: one-time validation of the ffmpeg binary

use crate::error::{CoreError, CoreResult, command_start_error};

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Builds the loudnorm ffmpeg command
pub mod ffmpeg;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Test doubles for the external tool traits
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::build_normalize_command;
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CommandFfprobeExecutor, FfprobeExecutor};

// ============================================================================
// ENGINE RESOLUTION
// ============================================================================

/// Verifies that the ffmpeg binary at `ffmpeg_path` can be executed.
///
/// Runs `<ffmpeg_path> -version` once with output discarded. Only the ability
/// to start the process matters; the exit status is not inspected.
///
/// # Errors
///
/// * `CoreError::EngineNotFound` - the binary does not exist
/// * `CoreError::CommandStart` - the binary exists but could not be started
pub fn resolve_engine(ffmpeg_path: &Path) -> CoreResult<()> {
    let result = Command::new(ffmpeg_path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found ffmpeg at {}", ffmpeg_path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("ffmpeg not found at {}", ffmpeg_path.display());
            Err(CoreError::EngineNotFound(ffmpeg_path.display().to_string()))
        }
        Err(e) => {
            log::error!("Failed to start '{}': {}", ffmpeg_path.display(), e);
            Err(command_start_error(ffmpeg_path.display().to_string(), e))
        }
    }
}

// ============================================================================
// FILE METADATA ACCESS
// ============================================================================

/// Abstraction over file size lookups.
pub trait FileMetadataProvider {
    /// Gets the size of the file at the given path in bytes.
    fn get_size(&self, path: &Path) -> CoreResult<u64>;
}

/// `FileMetadataProvider` backed by `std::fs::metadata`.
#[derive(Debug, Clone, Default)]
pub struct StdFsMetadataProvider;

impl FileMetadataProvider for StdFsMetadataProvider {
    fn get_size(&self, path: &Path) -> CoreResult<u64> {
        Ok(std::fs::metadata(path)?.len())
    }
}
