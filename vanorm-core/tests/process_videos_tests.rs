// vanorm-core/tests/process_videos_tests.rs

use vanorm_core::config::CoreConfig;
use vanorm_core::events::{Event, NullEventHandler};
use vanorm_core::external::mocks::{
    MockFfmpegSpawner, MockFfprobeExecutor, MockMetadataProvider, MockProbeResponse,
};
use vanorm_core::reporting::FailureKind;
use vanorm_core::{CancellationToken, ProcessingContext, process_videos, run_batch};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel};
use std::cell::RefCell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::tempdir;

const MB: u64 = 1024 * 1024;

// Helper to create a sparse input file of the given size
fn create_video(dir: &Path, filename: &str, size: u64) -> PathBuf {
    let file_path = dir.join(filename);
    let file = File::create(&file_path).expect("Failed to create dummy file");
    file.set_len(size).expect("Failed to size dummy file");
    file_path
}

fn progress(frame: u32, time: &str) -> FfmpegEvent {
    FfmpegEvent::Progress(FfmpegProgress {
        frame,
        fps: 30.0,
        q: -1.0,
        size_kb: 1024,
        time: time.to_string(),
        bitrate_kbps: 192.0,
        speed: 4.0,
        raw_log_message: format!(
            "frame={frame} fps=30 q=-1.0 size=1024kB time={time} bitrate=192.0kbits/s speed=4x"
        ),
    })
}

fn log_line(line: &str) -> FfmpegEvent {
    FfmpegEvent::Log(LogLevel::Info, line.to_string())
}

fn label(event: &Event) -> String {
    match event {
        Event::BatchStarted { total, .. } => format!("batch_started:{total}"),
        Event::FileStarted { index, .. } => format!("file_started:{index}"),
        Event::Progress { index, .. } => format!("progress:{index}"),
        Event::FileCompleted { index, .. } => format!("file_completed:{index}"),
        Event::FileFailed { index, .. } => format!("file_failed:{index}"),
        Event::BatchComplete { .. } => "batch_complete".to_string(),
    }
}

#[test]
fn test_run_batch_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let a = create_video(input_dir.path(), "a.mp4", 10 * MB);
    let b = create_video(input_dir.path(), "b.mkv", 20 * MB);

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "/a.mp4",
        vec![progress(100, "00:00:03.33"), progress(900, "00:00:30.00")],
        9 * MB,
    );
    spawner.add_success_expectation("/b.mkv", vec![progress(1800, "00:01:00.50")], 19 * MB);

    let ffprobe = MockFfprobeExecutor::new();
    ffprobe.expect_stream_duration(&a, MockProbeResponse::Output("30.0\n".to_string()));
    // MKV without stream duration falls back to the container
    ffprobe.expect_stream_duration(&b, MockProbeResponse::Output("N/A\n".to_string()));
    ffprobe.expect_format_duration(&b, MockProbeResponse::Output("60.5\n".to_string()));

    let metadata = MockMetadataProvider::new();
    let config = CoreConfig::default();
    let events = RefCell::new(Vec::new());
    let on_event = |event: &Event| events.borrow_mut().push(label(event));
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &on_event);

    let summary = run_batch(&ctx, input_dir.path(), false)?;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded_count(), 2);
    assert!(!summary.has_failures());
    assert!(!summary.cancelled);
    assert_eq!(summary.total_input_mb(), 30.0);
    assert_eq!(summary.total_output_mb(), 28.0);

    let first = &summary.succeeded[0];
    assert_eq!(first.path, a);
    assert_eq!(first.output_path, input_dir.path().join("normalized_a.mp4"));
    assert_eq!(first.duration_secs, 30.0);
    assert_eq!(summary.succeeded[1].duration_secs, 60.5);
    assert!(input_dir.path().join("normalized_b.mkv").exists());

    let calls = spawner.get_received_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].iter().any(|arg| arg == "loudnorm=I=-14:LRA=11:TP=-1.5"));
    assert!(calls[0].iter().any(|arg| arg == "-y"));
    let expected_output = input_dir.path().join("normalized_b.mkv");
    assert_eq!(calls[1].last().map(String::as_str), expected_output.to_str());

    assert_eq!(
        *events.borrow(),
        vec![
            "batch_started:2",
            "file_started:1",
            "progress:1",
            "progress:1",
            "file_completed:1",
            "file_started:2",
            "progress:2",
            "file_completed:2",
            "batch_complete",
        ]
    );

    input_dir.close()?;
    Ok(())
}

#[test]
fn test_failure_is_isolated_and_batch_continues() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let files_on_disk = [
        create_video(input_dir.path(), "a.mp4", 4 * MB),
        create_video(input_dir.path(), "b.mkv", 4 * MB),
        create_video(input_dir.path(), "c.avi", 4 * MB),
    ];

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("/a.mp4", vec![progress(10, "00:00:01.00")], 3 * MB);
    spawner.add_exit_error_expectation(
        "/b.mkv",
        vec![
            log_line("Input #0, matroska,webm, from 'b.mkv':"),
            log_line("frame=   10 fps=0.0 q=-1.0 size=       0kB time=00:00:00.40 bitrate=N/A"),
            FfmpegEvent::Error("b.mkv: Invalid data found when processing input".to_string()),
        ],
        1,
    );
    spawner.add_success_expectation("/c.avi", vec![], 3 * MB);

    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    let config = CoreConfig::default();
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler);

    let files = vanorm_core::find_processable_files(input_dir.path(), false)?;
    assert_eq!(files.len(), files_on_disk.len());
    let summary = process_videos(&ctx, input_dir.path(), &files);

    assert_eq!(summary.succeeded_count(), 2);
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(spawner.get_received_calls().len(), 3);

    let failure = &summary.failed[0];
    assert_eq!(failure.path, files_on_disk[1]);
    assert_eq!(failure.kind, FailureKind::EngineFailure);
    assert!(failure.detail.contains("Invalid data found when processing input"));
    assert!(!failure.detail.contains("frame="), "progress lines are not failure detail");

    // Unknown durations do not block processing
    assert!(summary.succeeded.iter().all(|r| r.duration_secs == 0.0));
    assert!(!input_dir.path().join("normalized_b.mkv").exists());

    input_dir.close()?;
    Ok(())
}

#[test]
fn test_size_lookup_failure_is_reported_per_file() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    let a = create_video(input_dir.path(), "a.mp4", MB);
    create_video(input_dir.path(), "b.mp4", MB);

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("/b.mp4", vec![], MB);
    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    metadata.fail_for(&a);
    let config = CoreConfig::default();
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler);

    let summary = run_batch(&ctx, input_dir.path(), false)?;

    assert_eq!(summary.succeeded_count(), 1);
    assert_eq!(summary.failed[0].kind, FailureKind::Unexpected);
    assert_eq!(spawner.get_received_calls().len(), 1);
    Ok(())
}

#[test]
fn test_timeout_kills_engine_and_moves_on() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    create_video(input_dir.path(), "hang.mkv", MB);
    create_video(input_dir.path(), "ok.mp4", MB);

    let spawner = MockFfmpegSpawner::new();
    spawner.add_slow_expectation(
        "/hang.mkv",
        (1..=10).map(|i| progress(i, "00:00:00.10")).collect(),
        Duration::from_millis(40),
    );
    spawner.add_success_expectation("/ok.mp4", vec![], MB);

    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    let mut config = CoreConfig::default();
    config.timeout = Some(Duration::from_millis(60));
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler);

    let summary = run_batch(&ctx, input_dir.path(), false)?;

    assert!(spawner.was_killed());
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.failed[0].kind, FailureKind::Timeout);
    assert_eq!(summary.succeeded_count(), 1);
    assert!(!summary.cancelled);
    Ok(())
}

#[test]
fn test_timeout_fires_while_engine_is_silent() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    create_video(input_dir.path(), "stuck.mkv", MB);

    let spawner = MockFfmpegSpawner::new();
    // One line of output, then nothing for far longer than the limit
    spawner.add_stalled_expectation(
        "/stuck.mkv",
        vec![log_line("Input #0, matroska,webm, from 'stuck.mkv':")],
        Duration::from_secs(30),
    );

    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    let mut config = CoreConfig::default();
    config.timeout = Some(Duration::from_millis(100));
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler);

    let started = Instant::now();
    let summary = run_batch(&ctx, input_dir.path(), false)?;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(spawner.was_killed());
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.failed[0].kind, FailureKind::Timeout);
    Ok(())
}

#[test]
fn test_cancellation_while_engine_is_silent() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    create_video(input_dir.path(), "stuck.mp4", MB);

    let spawner = MockFfmpegSpawner::new();
    spawner.add_stalled_expectation("/stuck.mp4", vec![], Duration::from_secs(30));

    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    let config = CoreConfig::default();
    let token = CancellationToken::new();
    let remote = token.clone();
    // Ctrl-C lands after the engine started but before it printed anything
    let on_event = move |event: &Event| {
        if matches!(event, Event::FileStarted { .. }) {
            remote.cancel();
        }
    };
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &on_event)
        .with_cancellation(token);

    let started = Instant::now();
    let summary = run_batch(&ctx, input_dir.path(), false)?;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(summary.cancelled);
    assert!(spawner.was_killed());
    assert_eq!(summary.failed[0].kind, FailureKind::Cancelled);
    Ok(())
}

#[test]
fn test_cancellation_during_file_stops_batch() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    create_video(input_dir.path(), "a.mp4", MB);
    create_video(input_dir.path(), "b.mp4", MB);

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation(
        "/a.mp4",
        vec![progress(1, "00:00:00.04"), progress(2, "00:00:00.08")],
        MB,
    );

    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    let config = CoreConfig::default();
    let token = CancellationToken::new();
    let remote = token.clone();
    // Simulates Ctrl-C arriving while the first file is encoding
    let on_event = move |event: &Event| {
        if matches!(event, Event::Progress { .. }) {
            remote.cancel();
        }
    };
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &on_event)
        .with_cancellation(token);

    let summary = run_batch(&ctx, input_dir.path(), false)?;

    assert!(summary.cancelled);
    assert!(spawner.was_killed());
    assert_eq!(summary.failed_count(), 1);
    assert_eq!(summary.failed[0].kind, FailureKind::Cancelled);
    assert_eq!(summary.skipped_count(), 1);
    // The second file was never started
    assert_eq!(spawner.get_received_calls().len(), 1);
    Ok(())
}

#[test]
fn test_summary_serializes_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = tempdir()?;
    create_video(input_dir.path(), "a.mp4", 2 * MB);
    create_video(input_dir.path(), "z.flv", MB);

    let spawner = MockFfmpegSpawner::new();
    spawner.add_success_expectation("/a.mp4", vec![], MB);
    spawner.add_exit_error_expectation("/z.flv", vec![], 69);

    let ffprobe = MockFfprobeExecutor::new();
    let metadata = MockMetadataProvider::new();
    let config = CoreConfig::default();
    let ctx = ProcessingContext::new(&spawner, &ffprobe, &metadata, &config, &NullEventHandler);

    let summary = run_batch(&ctx, input_dir.path(), false)?;
    let json = serde_json::to_value(&summary)?;

    assert_eq!(json["total"], 2);
    assert_eq!(json["cancelled"], false);
    assert_eq!(json["succeeded"][0]["input_size_mb"], 2.0);
    assert_eq!(json["failed"][0]["kind"], "engine_failure");
    let detail = json["failed"][0]["detail"].as_str().unwrap_or_default();
    assert!(detail.contains("ffmpeg exited with"));
    Ok(())
}
