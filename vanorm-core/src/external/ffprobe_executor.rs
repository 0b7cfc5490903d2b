//! FFprobe integration for duration queries.
//!
//! Each query asks ffprobe for a single entry printed as a bare value
//! (`-of default=noprint_wrappers=1:nokey=1`), so the raw stdout is the
//! number itself, `N/A`, or nothing. Parsing is left to the caller.

use crate::error::{CoreResult, command_start_error};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Raw duration queries against a media file.
pub trait FfprobeExecutor {
    /// Duration of the first video stream, as printed by the probe.
    fn stream_duration(&self, input_path: &Path) -> CoreResult<String>;

    /// Duration of the whole container, as printed by the probe.
    fn format_duration(&self, input_path: &Path) -> CoreResult<String>;
}

/// `FfprobeExecutor` that runs the ffprobe binary.
#[derive(Debug, Clone)]
pub struct CommandFfprobeExecutor {
    ffprobe_path: PathBuf,
}

impl CommandFfprobeExecutor {
    pub fn new(ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Arguments for the first-video-stream duration query.
    #[must_use]
    pub fn stream_duration_args(input_path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "stream=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            input_path.to_string_lossy().into_owned(),
        ]
    }

    /// Arguments for the container duration query.
    #[must_use]
    pub fn format_duration_args(input_path: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "format=duration".to_string(),
            "-of".to_string(),
            "default=noprint_wrappers=1:nokey=1".to_string(),
            input_path.to_string_lossy().into_owned(),
        ]
    }

    fn run(&self, args: &[String], context: &str) -> CoreResult<String> {
        log::debug!(
            "Running ffprobe ({}): {} {}",
            context,
            self.ffprobe_path.display(),
            args.join(" ")
        );

        let output = Command::new(&self.ffprobe_path)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command_start_error(format!("ffprobe ({context})"), e))?;

        if !output.status.success() {
            log::debug!(
                "ffprobe ({}) exited with {}: {}",
                context,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for CommandFfprobeExecutor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FFPROBE_PATH)
    }
}

impl FfprobeExecutor for CommandFfprobeExecutor {
    fn stream_duration(&self, input_path: &Path) -> CoreResult<String> {
        self.run(&Self::stream_duration_args(input_path), "stream duration")
    }

    fn format_duration(&self, input_path: &Path) -> CoreResult<String> {
        self.run(&Self::format_duration_args(input_path), "format duration")
    }
}
