// ============================================================================
// vanorm-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the configuration used by the normalization pipeline:
// where the ffmpeg/ffprobe binaries live, the loudnorm targets, the audio
// encoding settings and the output naming rule.
//
// USAGE:
// Instances of CoreConfig are created by consumers of the library (like
// vanorm-cli), validated once, and passed to the processing functions.

use crate::error::{CoreError, CoreResult};

use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::time::Duration;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default ffmpeg executable, looked up on PATH.
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Default ffprobe executable, looked up on PATH.
pub const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Integrated loudness target in LUFS (streaming platforms' -14 LUFS).
pub const DEFAULT_TARGET_LOUDNESS: f64 = -14.0;

/// Loudness range target (LRA).
pub const DEFAULT_LOUDNESS_RANGE: f64 = 11.0;

/// Maximum true peak in dBTP.
pub const DEFAULT_TRUE_PEAK: f64 = -1.5;

/// Audio encoder used for the re-encoded audio streams.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Audio bitrate used for the re-encoded audio streams.
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";

/// Prefix added to the input filename to form the output filename.
pub const DEFAULT_OUTPUT_PREFIX: &str = "normalized_";

// Ranges accepted by ffmpeg's loudnorm filter.
const LOUDNESS_RANGE_I: (f64, f64) = (-70.0, -5.0);
const LOUDNESS_RANGE_LRA: (f64, f64) = (1.0, 50.0);
const LOUDNESS_RANGE_TP: (f64, f64) = (-9.0, 0.0);

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Configuration for the normalization pipeline.
///
/// # Examples
///
/// ```rust
/// use vanorm_core::CoreConfig;
///
/// let mut config = CoreConfig::new("/opt/ffmpeg/bin/ffmpeg");
/// assert_eq!(config.ffprobe_path.to_str(), Some("/opt/ffmpeg/bin/ffprobe"));
///
/// config.target_loudness = -16.0;
/// config.validate().unwrap();
/// assert_eq!(config.loudnorm_filter(), "loudnorm=I=-16:LRA=11:TP=-1.5");
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// ffmpeg executable used for normalization
    pub ffmpeg_path: PathBuf,

    /// ffprobe executable used for duration probing
    pub ffprobe_path: PathBuf,

    /// Integrated loudness target (LUFS)
    pub target_loudness: f64,

    /// Loudness range target (LU)
    pub loudness_range: f64,

    /// True peak ceiling (dBTP)
    pub true_peak: f64,

    /// Audio encoder name passed to `-c:a`
    pub audio_codec: String,

    /// Audio bitrate passed to `-b:a`
    pub audio_bitrate: String,

    /// Prefix applied to the input file name for the output file
    pub output_prefix: String,

    /// Whether to request `-hwaccel auto`
    pub hardware_accel: bool,

    /// Wall-clock ceiling for a single ffmpeg invocation
    pub timeout: Option<Duration>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG_PATH)
    }
}

impl CoreConfig {
    /// Creates a configuration with default targets for the given ffmpeg binary.
    ///
    /// The ffprobe path is derived from the ffmpeg path: when ffmpeg is given
    /// with a directory component, ffprobe is expected next to it.
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        let ffmpeg_path = ffmpeg_path.into();
        let ffprobe_path = sibling_ffprobe(&ffmpeg_path);
        Self {
            ffmpeg_path,
            ffprobe_path,
            target_loudness: DEFAULT_TARGET_LOUDNESS,
            loudness_range: DEFAULT_LOUDNESS_RANGE,
            true_peak: DEFAULT_TRUE_PEAK,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            hardware_accel: true,
            timeout: None,
        }
    }

    /// Renders the loudnorm filter expression for `-af`.
    #[must_use]
    pub fn loudnorm_filter(&self) -> String {
        format!(
            "loudnorm=I={}:LRA={}:TP={}",
            self.target_loudness, self.loudness_range, self.true_peak
        )
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` describing the first invalid value.
    pub fn validate(&self) -> CoreResult<()> {
        check_range("target loudness", self.target_loudness, LOUDNESS_RANGE_I)?;
        check_range("loudness range", self.loudness_range, LOUDNESS_RANGE_LRA)?;
        check_range("true peak", self.true_peak, LOUDNESS_RANGE_TP)?;

        if self.audio_codec.trim().is_empty() {
            return Err(CoreError::Config("audio codec must not be empty".to_string()));
        }
        if self.audio_bitrate.trim().is_empty() {
            return Err(CoreError::Config("audio bitrate must not be empty".to_string()));
        }

        if self.output_prefix.is_empty() {
            return Err(CoreError::Config("output prefix must not be empty".to_string()));
        }
        if self.output_prefix.contains(MAIN_SEPARATOR) || self.output_prefix.contains('/') {
            return Err(CoreError::Config(format!(
                "output prefix '{}' must not contain a path separator",
                self.output_prefix
            )));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::Config("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> CoreResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(CoreError::Config(format!(
            "{name} {value} is outside the supported range {min}..={max}"
        )));
    }
    Ok(())
}

/// Derives the ffprobe path that ships alongside an ffmpeg binary.
fn sibling_ffprobe(ffmpeg_path: &Path) -> PathBuf {
    let file_name = ffmpeg_path
        .file_name()
        .map(|name| name.to_string_lossy().replacen("ffmpeg", "ffprobe", 1))
        .filter(|name| name.contains("ffprobe"))
        .unwrap_or_else(|| DEFAULT_FFPROBE_PATH.to_string());

    match ffmpeg_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}
