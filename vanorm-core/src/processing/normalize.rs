// ============================================================================
// vanorm-core/src/processing/normalize.rs
// ============================================================================
//
// NORMALIZATION: Single-File ffmpeg loudnorm Invocation
//
// Runs one ffmpeg process for one file and turns its outcome into either a
// NormalizeResult or a file-scoped CoreError.
//
// WORKFLOW:
// 1. Gather pre-processing metrics (input size, probed duration)
// 2. Build and spawn the loudnorm command
// 3. Stream stderr events: progress lines are forwarded as events, the
//    remaining lines are kept (bounded) as failure detail
// 4. After each event, and on idle ticks while ffmpeg is silent, observe
//    cancellation and the per-file deadline; on either, kill the child and
//    report Cancelled / Timeout
// 5. On a non-zero exit report EngineFailure; any partial output is left
//    in place
// 6. On success read the output size and compute the average throughput

use super::ProcessingContext;
use super::duration::probe_duration;
use crate::NormalizeResult;
use crate::discovery::VideoFile;
use crate::error::{CoreError, CoreResult};
use crate::events::Event;
use crate::external::{
    FfmpegProcess, FfmpegSpawner, FfprobeExecutor, FileMetadataProvider, build_normalize_command,
};
use crate::utils::{calculate_average_speed, get_file_size_mb, is_progress_line, output_path_for};

use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress};
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of trailing non-progress stderr lines kept as failure detail.
const ERROR_DETAIL_LINES: usize = 20;

/// How long ffmpeg may stay silent before cancellation and the deadline are
/// checked anyway.
const IDLE_CHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Bounded buffer of the most recent diagnostic lines.
struct DiagnosticTail {
    lines: VecDeque<String>,
    capacity: usize,
}

impl DiagnosticTail {
    fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    fn into_detail(self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(Vec::from(self.lines).join("\n"))
        }
    }
}

/// Reconstructs a stats line when ffmpeg-sidecar did not keep the raw text.
fn progress_line(progress: &FfmpegProgress) -> String {
    if !progress.raw_log_message.trim().is_empty() {
        return progress.raw_log_message.trim().to_string();
    }
    format!(
        "frame={} fps={} size={}kB time={} bitrate={}kbits/s speed={}x",
        progress.frame,
        progress.fps,
        progress.size_kb,
        progress.time,
        progress.bitrate_kbps,
        progress.speed
    )
}

/// Normalizes the audio of one file into `<dir>/<prefix><name>`.
///
/// `index` is 1-based and, with `total`, only used for reporting.
///
/// # Errors
///
/// * `CoreError::EngineFailure` - ffmpeg exited with a non-zero status
/// * `CoreError::Timeout` / `CoreError::Cancelled` - the run was interrupted
/// * any other variant - spawn or file system failures
pub fn normalize_file<S, P, M>(
    ctx: &ProcessingContext<'_, S, P, M>,
    file: &VideoFile,
    index: usize,
    total: usize,
) -> CoreResult<NormalizeResult>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    M: FileMetadataProvider,
{
    let start_time = Instant::now();
    let input_path = &file.path;
    let output_path = output_path_for(input_path, &ctx.config.output_prefix)?;

    // ---- Pre-processing metrics ----
    let input_size_mb = get_file_size_mb(ctx.metadata, input_path)?;
    let duration_secs = probe_duration(ctx.ffprobe, input_path);

    info!(
        "Processing file {} of {}: {} ({:.2} MB)",
        index,
        total,
        input_path.display(),
        input_size_mb
    );
    ctx.events.handle(&Event::FileStarted {
        index,
        total,
        path: input_path.clone(),
        input_size_mb,
        duration_secs,
    });

    // ---- Invocation ----
    let cmd = build_normalize_command(ctx.config, input_path, &output_path);
    let mut process = ctx.spawner.spawn(cmd)?;

    let deadline = ctx.config.timeout.map(|limit| (Instant::now() + limit, limit));
    let mut diagnostics = DiagnosticTail::new(ERROR_DETAIL_LINES);

    let streamed = process.handle_events(IDLE_CHECK_INTERVAL, |event| {
        match event {
            Some(FfmpegEvent::Progress(progress)) => {
                ctx.events.handle(&Event::Progress {
                    index,
                    line: progress_line(&progress),
                });
            }
            Some(FfmpegEvent::Log(_, line)) => {
                if is_progress_line(&line) {
                    ctx.events.handle(&Event::Progress {
                        index,
                        line: line.trim().to_string(),
                    });
                } else {
                    diagnostics.push(&line);
                }
            }
            Some(FfmpegEvent::Error(line)) => diagnostics.push(&line),
            // Other events and idle ticks only trigger the checks below
            _ => {}
        }

        if ctx.cancel.is_cancelled() {
            return Err(CoreError::Cancelled(input_path.clone()));
        }
        if let Some((at, limit)) = deadline {
            if Instant::now() >= at {
                return Err(CoreError::Timeout {
                    path: input_path.clone(),
                    limit,
                });
            }
        }
        Ok(())
    });

    if let Err(e) = streamed {
        warn!("Stopping ffmpeg for {}: {}", input_path.display(), e);
        if let Err(kill_err) = process.kill() {
            debug!("Failed to kill ffmpeg for {}: {}", input_path.display(), kill_err);
        }
        if let Err(wait_err) = process.wait() {
            debug!("Failed to reap ffmpeg for {}: {}", input_path.display(), wait_err);
        }
        return Err(e);
    }

    let status = process.wait()?;
    if !status.success() {
        let detail = diagnostics
            .into_detail()
            .unwrap_or_else(|| format!("ffmpeg exited with {status}"));
        debug!("ffmpeg failed for {} ({}): {}", input_path.display(), status, detail);
        return Err(CoreError::EngineFailure {
            path: input_path.clone(),
            status,
            detail,
        });
    }

    // ---- Completion statistics ----
    let elapsed = start_time.elapsed();
    let output_size_mb = get_file_size_mb(ctx.metadata, &output_path)?;
    let average_speed = calculate_average_speed(input_size_mb, elapsed.as_secs_f64());

    Ok(NormalizeResult {
        path: input_path.clone(),
        output_path,
        duration_secs,
        elapsed,
        input_size_mb,
        output_size_mb,
        average_speed,
    })
}
