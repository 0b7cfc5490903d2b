// vanorm-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vanorm: batch audio loudness normalizer for video files",
    long_about = "Normalizes the audio of every video file in a directory to a target \
                  loudness using ffmpeg's loudnorm filter. Video and subtitle streams are \
                  copied unchanged; outputs are written next to their inputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalizes the audio loudness of video files in a directory
    Normalize(NormalizeArgs),
}

#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Directory containing the video files to normalize
    #[arg(required = true, value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Also process files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    // --- Tools ---
    /// Path to the ffmpeg executable
    #[arg(long, value_name = "PATH", env = "VANORM_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Path to the ffprobe executable (defaults to the one next to ffmpeg)
    #[arg(long, value_name = "PATH", env = "VANORM_FFPROBE")]
    pub ffprobe: Option<PathBuf>,

    // --- Loudness Targets ---
    /// Integrated loudness target in LUFS
    #[arg(long, value_name = "LUFS", allow_hyphen_values = true)]
    pub target_i: Option<f64>,

    /// Loudness range target
    #[arg(long, value_name = "LU")]
    pub lra: Option<f64>,

    /// Maximum true peak in dBTP
    #[arg(long, value_name = "DBTP", allow_hyphen_values = true)]
    pub true_peak: Option<f64>,

    // --- Audio Encoding ---
    /// Audio encoder passed to ffmpeg's -c:a
    #[arg(long, value_name = "CODEC")]
    pub audio_codec: Option<String>,

    /// Audio bitrate passed to ffmpeg's -b:a (e.g. 192k)
    #[arg(long, value_name = "BITRATE")]
    pub audio_bitrate: Option<String>,

    // --- Output ---
    /// Prefix prepended to output file names
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Skip files whose name already starts with the output prefix
    #[arg(long)]
    pub skip_normalized: bool,

    /// Disable `-hwaccel auto` decoding
    #[arg(long)]
    pub no_hwaccel: bool,

    /// Abort a single file after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print the batch summary as JSON instead of the human-readable report
    #[arg(long)]
    pub json: bool,
}
