//! Structured events emitted while a batch runs.
//!
//! The core never writes to the terminal. Consumers implement
//! [`EventHandler`] (or pass a closure) and decide how to render each event.

use crate::NormalizeResult;
use crate::reporting::{BatchSummary, FileFailure};

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Event {
    /// Discovery finished; `total` files will be attempted.
    BatchStarted { root: PathBuf, total: usize },

    /// Pre-processing metrics for a file are known and ffmpeg is about to start.
    FileStarted {
        index: usize,
        total: usize,
        path: PathBuf,
        input_size_mb: f64,
        duration_secs: f64,
    },

    /// A raw ffmpeg stderr line carrying `frame=` or `time=`.
    Progress { index: usize, line: String },

    FileCompleted {
        index: usize,
        total: usize,
        result: NormalizeResult,
    },

    FileFailed {
        index: usize,
        total: usize,
        failure: FileFailure,
    },

    BatchComplete { summary: BatchSummary },
}

pub trait EventHandler {
    fn handle(&self, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Event),
{
    fn handle(&self, event: &Event) {
        self(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventHandler;

impl EventHandler for NullEventHandler {
    fn handle(&self, _event: &Event) {}
}
