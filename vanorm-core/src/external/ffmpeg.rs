// ============================================================================
// vanorm-core/src/external/ffmpeg.rs
// ============================================================================
//
// FFMPEG COMMAND: Loudness Normalization Command Builder
//
// Builds the single ffmpeg invocation used per file. Every input stream is
// mapped, video and subtitles are stream-copied, and only audio is re-encoded
// through the loudnorm filter. The output is overwritten without prompting.

use crate::config::CoreConfig;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::Path;

/// Builds the ffmpeg command that normalizes `input` into `output`.
///
/// The resulting argument list is:
///
/// ```text
/// [-hwaccel auto] -i <input> -map 0 -threads auto -c:v copy -c:s copy
/// -c:a <codec> -b:a <bitrate> -af loudnorm=I=..:LRA=..:TP=.. -stats -v info -y <output>
/// ```
pub fn build_normalize_command(config: &CoreConfig, input: &Path, output: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new_with_path(&config.ffmpeg_path);

    // Hardware decode options must precede the input
    if config.hardware_accel {
        cmd.args(["-hwaccel", "auto"]);
    }

    cmd.input(input.to_string_lossy().as_ref());
    cmd.args(["-map", "0"]);
    cmd.args(["-threads", "auto"]);
    cmd.args(["-c:v", "copy"]);
    cmd.args(["-c:s", "copy"]);
    cmd.args(["-c:a", config.audio_codec.as_str()]);
    cmd.args(["-b:a", config.audio_bitrate.as_str()]);
    cmd.args(["-af", config.loudnorm_filter().as_str()]);
    cmd.arg("-stats");
    cmd.args(["-v", "info"]);
    cmd.arg("-y");
    cmd.output(output.to_string_lossy().as_ref());

    log::debug!("Built normalization command: {:?}", cmd.as_inner());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &mut FfmpegCommand) -> Vec<String> {
        cmd.as_inner()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn position(args: &[String], value: &str) -> usize {
        args.iter()
            .position(|a| a == value)
            .unwrap_or_else(|| panic!("missing argument {value} in {args:?}"))
    }

    #[test]
    fn test_normalize_command_shape() {
        let config = CoreConfig::new("/opt/ffmpeg/bin/ffmpeg");
        let mut cmd = build_normalize_command(
            &config,
            Path::new("/videos/a.mkv"),
            Path::new("/videos/normalized_a.mkv"),
        );

        assert_eq!(
            cmd.as_inner().get_program().to_string_lossy(),
            "/opt/ffmpeg/bin/ffmpeg"
        );

        let args = args_of(&mut cmd);
        let joined = args.join(" ");

        assert!(joined.contains("-hwaccel auto"));
        assert!(joined.contains("-i /videos/a.mkv"));
        assert!(joined.contains("-map 0"));
        assert!(joined.contains("-c:v copy"));
        assert!(joined.contains("-c:s copy"));
        assert!(joined.contains("-c:a aac"));
        assert!(joined.contains("-b:a 192k"));
        assert!(joined.contains("-af loudnorm=I=-14:LRA=11:TP=-1.5"));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/videos/normalized_a.mkv"));

        // Hardware acceleration applies to decoding, so it must precede the input
        assert!(position(&args, "-hwaccel") < position(&args, "-i"));
    }

    #[test]
    fn test_normalize_command_respects_config() {
        let mut config = CoreConfig::default();
        config.hardware_accel = false;
        config.audio_codec = "libopus".to_string();
        config.audio_bitrate = "128k".to_string();
        config.target_loudness = -23.0;
        config.loudness_range = 7.0;
        config.true_peak = -2.0;

        let mut cmd = build_normalize_command(&config, Path::new("in.mp4"), Path::new("out.mp4"));
        let joined = args_of(&mut cmd).join(" ");

        assert!(!joined.contains("-hwaccel"));
        assert!(joined.contains("-c:a libopus"));
        assert!(joined.contains("-b:a 128k"));
        assert!(joined.contains("loudnorm=I=-23:LRA=7:TP=-2"));
    }
}
