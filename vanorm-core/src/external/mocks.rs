// vanorm-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's unit tests and, through the "test-mocks" feature,
// for integration tests and downstream test suites.

use super::*;
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Builds an `ExitStatus` carrying the given exit code.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

/// Builds an `ExitStatus` carrying the given exit code.
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Pause before each emitted event.
    pub event_delay: Option<Duration>,
    /// Silence after the last event, reported to the handler as idle ticks.
    pub stall: Option<Duration>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
    killed: Rc<Cell<bool>>,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, idle_tick: Duration, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(Option<FfmpegEvent>) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            if let Some(delay) = self.event_delay {
                std::thread::sleep(delay);
            }
            handler(Some(event))?;
        }
        if let Some(stall) = self.stall {
            let silent_since = Instant::now();
            while silent_since.elapsed() < stall {
                std::thread::sleep(idle_tick.min(stall.saturating_sub(silent_since.elapsed())));
                handler(None)?;
            }
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        if self.killed.get() {
            return Ok(exit_status(255));
        }
        Ok(self.exit_status)
    }

    fn kill(&mut self) -> CoreResult<()> {
        self.killed.set(true);
        Ok(())
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    /// Size in bytes of the output file to create, if any.
    pub create_output: Option<u64>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawned command is matched against the first pending expectation
/// whose pattern appears in any argument. Unmatched commands panic.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
    kill_flags: Rc<RefCell<Vec<Rc<Cell<bool>>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    fn process(&self, events: Vec<FfmpegEvent>, exit_code: i32) -> MockFfmpegProcess {
        let killed = Rc::new(Cell::new(false));
        self.kill_flags.borrow_mut().push(Rc::clone(&killed));
        MockFfmpegProcess {
            events_to_emit: events,
            event_delay: None,
            stall: None,
            exit_status: exit_status(exit_code),
            killed,
        }
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_output: Option<u64>,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_output,
        });
    }

    /// Expects a command that emits `events`, exits 0 and writes an output of `output_size` bytes.
    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        output_size: u64,
    ) {
        let process = self.process(events, 0);
        self.add_expectation(arg_pattern, Ok(process), Some(output_size));
    }

    /// Like `add_success_expectation`, pausing `delay` before each event.
    pub fn add_slow_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        delay: Duration,
    ) {
        let mut process = self.process(events, 0);
        process.event_delay = Some(delay);
        self.add_expectation(arg_pattern, Ok(process), Some(0));
    }

    /// Expects a command that emits `events` and then writes nothing for `stall`.
    pub fn add_stalled_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        stall: Duration,
    ) {
        let mut process = self.process(events, 0);
        process.stall = Some(stall);
        self.add_expectation(arg_pattern, Ok(process), None);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), None);
    }

    /// Expects a command that emits `events` and exits with `exit_code` without writing output.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = self.process(events, exit_code);
        self.add_expectation(arg_pattern, Ok(process), None);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    /// Whether any spawned process was killed.
    pub fn was_killed(&self) -> bool {
        self.kill_flags.borrow().iter().any(|flag| flag.get())
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!(
                "MockFfmpegSpawner: No expectation found for command args: {:?}",
                args
            );
            panic!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        let process = expectation.result?;
        if let Some(size) = expectation.create_output {
            match args.last() {
                Some(output_path) => {
                    let file = std::fs::File::create(output_path)?;
                    file.set_len(size)?;
                }
                None => {
                    log::warn!("MockFfmpegSpawner couldn't find output path in args.")
                }
            }
        }
        Ok(process)
    }
}

/// Canned response for one ffprobe query.
#[derive(Debug, Clone)]
pub enum MockProbeResponse {
    /// The probe printed this text on stdout.
    Output(String),
    /// The probe could not be started.
    SpawnError,
}

impl MockProbeResponse {
    fn to_result(&self, context: &str) -> CoreResult<String> {
        match self {
            MockProbeResponse::Output(text) => Ok(text.clone()),
            MockProbeResponse::SpawnError => Err(CoreError::CommandStart(
                format!("ffprobe ({context})"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock spawn failure"),
            )),
        }
    }
}

/// Mock implementation of FfprobeExecutor.
///
/// Paths without an expectation answer with empty output.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    stream_results: Rc<RefCell<HashMap<PathBuf, MockProbeResponse>>>,
    format_results: Rc<RefCell<HashMap<PathBuf, MockProbeResponse>>>,
    stream_calls: Rc<Cell<usize>>,
    format_calls: Rc<Cell<usize>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect_stream_duration(&self, input_path: &Path, response: MockProbeResponse) {
        self.stream_results.borrow_mut().insert(input_path.to_path_buf(), response);
    }

    pub fn expect_format_duration(&self, input_path: &Path, response: MockProbeResponse) {
        self.format_results.borrow_mut().insert(input_path.to_path_buf(), response);
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.get()
    }

    pub fn format_calls(&self) -> usize {
        self.format_calls.get()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn stream_duration(&self, input_path: &Path) -> CoreResult<String> {
        self.stream_calls.set(self.stream_calls.get() + 1);
        match self.stream_results.borrow().get(input_path) {
            Some(response) => response.to_result("stream duration"),
            None => Ok(String::new()),
        }
    }

    fn format_duration(&self, input_path: &Path) -> CoreResult<String> {
        self.format_calls.set(self.format_calls.get() + 1);
        match self.format_results.borrow().get(input_path) {
            Some(response) => response.to_result("format duration"),
            None => Ok(String::new()),
        }
    }
}

/// Mock implementation of FileMetadataProvider.
///
/// Sizes set explicitly win; other paths fall back to the real file system.
#[derive(Clone, Default)]
pub struct MockMetadataProvider {
    sizes: Rc<RefCell<HashMap<PathBuf, u64>>>,
    failing: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_size(&self, path: &Path, bytes: u64) {
        self.sizes.borrow_mut().insert(path.to_path_buf(), bytes);
    }

    /// Makes size lookups for `path` fail with an I/O error.
    pub fn fail_for(&self, path: &Path) {
        self.failing.borrow_mut().push(path.to_path_buf());
    }
}

impl FileMetadataProvider for MockMetadataProvider {
    fn get_size(&self, path: &Path) -> CoreResult<u64> {
        if self.failing.borrow().iter().any(|p| p == path) {
            return Err(CoreError::Io(std::io::Error::other(format!(
                "mock metadata failure for {}",
                path.display()
            ))));
        }
        if let Some(size) = self.sizes.borrow().get(path) {
            return Ok(*size);
        }
        StdFsMetadataProvider.get_size(path)
    }
}
