// ============================================================================
// vanorm-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. ffmpeg-sidecar parses the process' stderr into events; the
// handler closure sees each event as it arrives, plus an idle tick whenever
// the process has been silent for a while.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    ///
    /// The handler receives `Some(event)` for each event and `None` after
    /// `idle_tick` passes without one, so it can act on a silent process.
    /// Stops at the first handler error and returns it; the process is left
    /// running so the caller can decide whether to kill it.
    fn handle_events<F>(&mut self, idle_tick: Duration, handler: F) -> CoreResult<()>
    where
        F: FnMut(Option<FfmpegEvent>) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;

    /// Terminates the process.
    fn kill(&mut self) -> CoreResult<()>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, idle_tick: Duration, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(Option<FfmpegEvent>) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg (event iterator)", ExitStatus::default(), e.to_string())
        })?;

        // The iterator blocks on stderr, so it is drained on its own thread.
        // The thread ends once the child's pipes close or the receiver is gone.
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for event in iterator {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            match rx.recv_timeout(idle_tick) {
                Ok(event) => handler(Some(event))?,
                Err(RecvTimeoutError::Timeout) => handler(None)?,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.0.kill().map_err(|e| command_wait_error("ffmpeg (kill)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}
