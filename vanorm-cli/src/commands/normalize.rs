//! Implementation of the 'normalize' subcommand.
//!
//! Builds the core configuration from the arguments, validates the ffmpeg
//! binary, discovers files and delegates the batch to vanorm-core.

use crate::cli::NormalizeArgs;
use crate::error::CliResult;
use crate::terminal::{QuietRenderer, TerminalRenderer};

use vanorm_core::discovery::exclude_prefixed;
use vanorm_core::{
    BatchSummary, CancellationToken, CommandFfprobeExecutor, CoreConfig, EventHandler,
    ProcessingContext, SidecarSpawner, StdFsMetadataProvider, find_processable_files,
    process_videos, resolve_engine,
};

use log::{debug, info};
use std::io;
use std::time::Duration;

/// Applies the command-line overrides on top of the defaults.
pub fn build_config(args: &NormalizeArgs) -> CoreConfig {
    let mut config = CoreConfig::new(args.ffmpeg.clone());
    if let Some(ffprobe) = &args.ffprobe {
        config.ffprobe_path = ffprobe.clone();
    }
    if let Some(target) = args.target_i {
        config.target_loudness = target;
    }
    if let Some(lra) = args.lra {
        config.loudness_range = lra;
    }
    if let Some(tp) = args.true_peak {
        config.true_peak = tp;
    }
    if let Some(codec) = &args.audio_codec {
        config.audio_codec = codec.clone();
    }
    if let Some(bitrate) = &args.audio_bitrate {
        config.audio_bitrate = bitrate.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.output_prefix = prefix.clone();
    }
    config.hardware_accel = !args.no_hwaccel;
    config.timeout = args.timeout.map(Duration::from_secs);
    config
}

/// Runs the normalize command and returns the batch summary.
///
/// # Errors
///
/// Only batch-fatal errors are returned: invalid configuration, a missing
/// ffmpeg binary, or an unusable input directory. Per-file failures are
/// part of the summary.
pub fn run_normalize(args: NormalizeArgs, cancel: CancellationToken) -> CliResult<BatchSummary> {
    let config = build_config(&args);
    config.validate()?;
    debug!("Effective configuration: {:?}", config);

    resolve_engine(&config.ffmpeg_path)?;

    let mut files = find_processable_files(&args.input_dir, args.recursive)?;
    if args.skip_normalized {
        let before = files.len();
        files = exclude_prefixed(files, &config.output_prefix);
        info!(
            "Skipping {} file(s) already prefixed with '{}'",
            before - files.len(),
            config.output_prefix
        );
    }

    let spawner = SidecarSpawner;
    let ffprobe = CommandFfprobeExecutor::new(config.ffprobe_path.clone());
    let terminal = TerminalRenderer::new();
    let quiet = QuietRenderer;
    let events: &dyn EventHandler = if args.json { &quiet } else { &terminal };

    let ctx = ProcessingContext::new(&spawner, &ffprobe, &StdFsMetadataProvider, &config, events)
        .with_cancellation(cancel);
    let summary = process_videos(&ctx, &args.input_dir, &files);

    if args.json {
        let json = serde_json::to_string_pretty(&summary).map_err(io::Error::from)?;
        println!("{json}");
    }

    Ok(summary)
}
