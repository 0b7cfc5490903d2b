//! Core processing logic and orchestration.
//!
//! This module organizes the per-file pipeline (duration probe, ffmpeg
//! loudnorm invocation) and the batch loop that drives it over a file list.

/// Duration probing with container fallback
pub mod duration;

/// Single-file loudness normalization
pub mod normalize;

/// Batch orchestration with per-file failure isolation
pub mod batch;

pub use batch::{process_videos, run_batch};
pub use duration::probe_duration;
pub use normalize::normalize_file;

use crate::cancel::CancellationToken;
use crate::config::CoreConfig;
use crate::events::EventHandler;

/// Everything the pipeline needs to process files.
///
/// The external tools are injected so tests can substitute mocks; the
/// production wiring uses `SidecarSpawner`, `CommandFfprobeExecutor` and
/// `StdFsMetadataProvider`.
pub struct ProcessingContext<'a, S, P, M> {
    pub spawner: &'a S,
    pub ffprobe: &'a P,
    pub metadata: &'a M,
    pub config: &'a CoreConfig,
    pub events: &'a dyn EventHandler,
    pub cancel: CancellationToken,
}

impl<'a, S, P, M> ProcessingContext<'a, S, P, M> {
    pub fn new(
        spawner: &'a S,
        ffprobe: &'a P,
        metadata: &'a M,
        config: &'a CoreConfig,
        events: &'a dyn EventHandler,
    ) -> Self {
        Self {
            spawner,
            ffprobe,
            metadata,
            config,
            events,
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the context's cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
