// ============================================================================
// vanorm-core/src/processing/batch.rs
// ============================================================================
//
// BATCH ORCHESTRATION: Sequential Processing with Failure Isolation
//
// Files are processed strictly one at a time in discovery order. A failure
// on one file is logged, recorded in the summary and reported as an event;
// the loop then moves on. Only cancellation stops the loop early.

use super::ProcessingContext;
use super::normalize::normalize_file;
use crate::discovery::{VideoFile, find_processable_files};
use crate::error::CoreResult;
use crate::events::Event;
use crate::external::{FfmpegSpawner, FfprobeExecutor, FileMetadataProvider};
use crate::reporting::{BatchSummary, FailureKind, FileFailure};
use crate::utils::{format_duration, format_megabytes};

use log::{error, info, warn};
use std::path::Path;
use std::time::Instant;

/// Processes `files` in order and returns the aggregated outcome.
///
/// Per-file errors never escape this function. `root` is only used for the
/// `BatchStarted` event.
pub fn process_videos<S, P, M>(
    ctx: &ProcessingContext<'_, S, P, M>,
    root: &Path,
    files: &[VideoFile],
) -> BatchSummary
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    M: FileMetadataProvider,
{
    let batch_start = Instant::now();
    let total = files.len();
    let mut summary = BatchSummary::new(total);

    info!("Found {} video file(s) to normalize in {}", total, root.display());
    ctx.events.handle(&Event::BatchStarted {
        root: root.to_path_buf(),
        total,
    });

    for (position, file) in files.iter().enumerate() {
        let index = position + 1;

        if ctx.cancel.is_cancelled() {
            warn!(
                "Cancellation requested, skipping the remaining {} file(s)",
                total - position
            );
            summary.cancelled = true;
            break;
        }

        match normalize_file(ctx, file, index, total) {
            Ok(result) => {
                info!(
                    "Completed {}: {} -> {} in {}",
                    file.file_name(),
                    format_megabytes(result.input_size_mb),
                    format_megabytes(result.output_size_mb),
                    format_duration(result.elapsed.as_secs_f64())
                );
                ctx.events.handle(&Event::FileCompleted {
                    index,
                    total,
                    result: result.clone(),
                });
                summary.succeeded.push(result);
            }
            Err(e) => {
                error!("Error processing {}: {}", file.path.display(), e);
                let failure = FileFailure::from_error(file.path.clone(), &e);
                ctx.events.handle(&Event::FileFailed {
                    index,
                    total,
                    failure: failure.clone(),
                });
                let was_cancelled = failure.kind == FailureKind::Cancelled;
                summary.failed.push(failure);
                if was_cancelled {
                    summary.cancelled = true;
                    break;
                }
            }
        }
    }

    summary.elapsed = batch_start.elapsed();
    info!(
        "Batch finished: {} succeeded, {} failed, {} skipped in {}",
        summary.succeeded_count(),
        summary.failed_count(),
        summary.skipped_count(),
        format_duration(summary.elapsed.as_secs_f64())
    );
    ctx.events.handle(&Event::BatchComplete {
        summary: summary.clone(),
    });

    summary
}

/// Discovers the video files under `root` and processes them.
///
/// # Errors
///
/// Only discovery failures are returned; see [`find_processable_files`].
pub fn run_batch<S, P, M>(
    ctx: &ProcessingContext<'_, S, P, M>,
    root: &Path,
    recursive: bool,
) -> CoreResult<BatchSummary>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    M: FileMetadataProvider,
{
    let files = find_processable_files(root, recursive)?;
    Ok(process_videos(ctx, root, &files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::config::CoreConfig;
    use crate::events::NullEventHandler;
    use crate::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor, MockMetadataProvider};

    #[test]
    fn test_empty_batch_spawns_nothing() {
        let spawner = MockFfmpegSpawner::new();
        let ffprobe = MockFfprobeExecutor::new();
        let metadata = MockMetadataProvider::new();
        let config = CoreConfig::default();
        let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler);

        let summary = process_videos(&ctx, Path::new("/videos"), &[]);
        assert_eq!(summary.total, 0);
        assert!(!summary.has_failures());
        assert!(!summary.cancelled);
        assert!(spawner.get_received_calls().is_empty());
    }

    #[test]
    fn test_cancel_before_start_skips_everything() {
        let spawner = MockFfmpegSpawner::new();
        let ffprobe = MockFfprobeExecutor::new();
        let metadata = MockMetadataProvider::new();
        let config = CoreConfig::default();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler)
            .with_cancellation(token);

        let files = vec![
            VideoFile::from_path("/videos/a.mp4").unwrap(),
            VideoFile::from_path("/videos/b.mkv").unwrap(),
        ];
        let summary = process_videos(&ctx, Path::new("/videos"), &files);

        assert!(summary.cancelled);
        assert_eq!(summary.skipped_count(), 2);
        assert!(spawner.get_received_calls().is_empty());
        assert_eq!(ffprobe.stream_calls(), 0);
    }
}
