//! Core library for batch audio loudness normalization of video files.
//!
//! This crate discovers video files, probes their duration with ffprobe and
//! re-encodes only the audio through ffmpeg's `loudnorm` filter, copying the
//! video and subtitle streams untouched. Progress and per-file outcomes are
//! reported through [`EventHandler`]; the batch returns a [`BatchSummary`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vanorm_core::{
//!     CommandFfprobeExecutor, CoreConfig, Event, ProcessingContext, SidecarSpawner,
//!     StdFsMetadataProvider, resolve_engine, run_batch,
//! };
//! use std::path::Path;
//!
//! let config = CoreConfig::new("/usr/local/bin/ffmpeg");
//! config.validate().unwrap();
//! resolve_engine(&config.ffmpeg_path).unwrap();
//!
//! let spawner = SidecarSpawner;
//! let ffprobe = CommandFfprobeExecutor::new(config.ffprobe_path.clone());
//! let on_event = |event: &Event| {
//!     if let Event::Progress { line, .. } = event {
//!         println!("{line}");
//!     }
//! };
//! let metadata = StdFsMetadataProvider;
//! let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &on_event);
//!
//! let summary = run_batch(&ctx, Path::new("/path/to/videos"), true).unwrap();
//! println!("{} of {} files normalized", summary.succeeded_count(), summary.total);
//! ```

pub mod cancel;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod external;
pub mod processing;
pub mod reporting;
pub mod utils;

// Re-exports for public API
pub use cancel::CancellationToken;
pub use config::CoreConfig;
pub use discovery::{VideoFile, find_processable_files};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventHandler, NullEventHandler};
pub use external::{
    CommandFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, FileMetadataProvider, SidecarSpawner,
    StdFsMetadataProvider, resolve_engine,
};
pub use processing::{ProcessingContext, normalize_file, process_videos, run_batch};
pub use reporting::{BatchSummary, FailureKind, FileFailure};
pub use utils::{format_duration, format_megabytes};

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result of normalizing one file, containing statistics about the run.
///
/// Collected into [`BatchSummary::succeeded`] by `process_videos`.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeResult {
    pub path: PathBuf,
    pub output_path: PathBuf,
    /// Probed duration in seconds, `0.0` when unknown
    pub duration_secs: f64,
    /// Wall-clock time including probing
    pub elapsed: Duration,
    pub input_size_mb: f64,
    pub output_size_mb: f64,
    /// Input megabytes per second of wall-clock time
    pub average_speed: f64,
}
