use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{RedubError, Result};

use super::{TimeStretcher, CLIP_CHANNELS, CLIP_SAMPLE_RATE};

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|e| {
            RedubError::Media(format!(
                "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(RedubError::Media("FFmpeg check failed".to_string()));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe")
        .arg("-version")
        .output()
        .map_err(|e| {
            RedubError::Media(format!(
                "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(RedubError::Media("FFprobe check failed".to_string()));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get container duration using FFprobe. Works for both audio and video files.
pub fn media_duration(input: &Path) -> Result<Duration> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| RedubError::Media(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RedubError::Media(format!("FFprobe failed: {stderr}")));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str.trim().parse().map_err(|e| {
        RedubError::Media(format!(
            "Failed to parse duration '{}': {e}",
            duration_str.trim()
        ))
    })?;

    Ok(Duration::from_secs_f64(duration_secs))
}

/// Convert any audio file to the canonical clip format (16-bit mono 24 kHz WAV).
///
/// Synthesis engines return audio in whatever format the backend produces;
/// everything entering the timeline goes through this normalization first.
pub fn transcode_to_clip(input: &Path, output: &Path) -> Result<()> {
    if !input.exists() {
        return Err(RedubError::Synthesis(format!(
            "Audio file missing before conversion: {}",
            input.display()
        )));
    }

    let sample_rate = CLIP_SAMPLE_RATE.to_string();
    let channels = CLIP_CHANNELS.to_string();

    let result = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args([
            "-vn",
            "-acodec",
            "pcm_s16le",
            "-ar",
            sample_rate.as_str(),
            "-ac",
            channels.as_str(),
        ])
        .arg(output)
        .output()
        .map_err(|e| RedubError::Synthesis(format!("Failed to run FFmpeg: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(RedubError::Synthesis(format!(
            "FFmpeg conversion failed: {}",
            last_line(&stderr)
        )));
    }

    if !output.exists() {
        return Err(RedubError::Synthesis(
            "Converted audio file was not created".to_string(),
        ));
    }

    Ok(())
}

/// Build an atempo filter expression for the given tempo ratio.
///
/// A single atempo instance only accepts [0.5, 2.0]; ratios outside that
/// range are expressed as a chain of instances.
fn atempo_filter(ratio: f64) -> String {
    let mut stages = Vec::new();
    let mut remaining = ratio;

    while remaining > 2.0 {
        stages.push("atempo=2.0".to_string());
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        stages.push("atempo=0.5".to_string());
        remaining /= 0.5;
    }
    stages.push(format!("atempo={remaining:.6}"));

    stages.join(",")
}

/// Time-stretcher backed by FFmpeg's atempo filter.
///
/// Output is forced to the canonical clip format so stretched clips can be
/// appended to the timeline without a second conversion.
pub struct FfmpegStretcher;

impl TimeStretcher for FfmpegStretcher {
    fn stretch(&self, input: &Path, output: &Path, ratio: f64) -> Result<()> {
        if ratio <= 0.0 {
            return Err(RedubError::Stretch(format!(
                "Invalid tempo ratio: {ratio}"
            )));
        }

        let filter = atempo_filter(ratio);
        info!("Stretching {} by {:.3}x", input.display(), ratio);
        debug!("atempo chain: {filter}");

        let sample_rate = CLIP_SAMPLE_RATE.to_string();
        let channels = CLIP_CHANNELS.to_string();

        let result = Command::new("ffmpeg")
            .args(["-y", "-i"])
            .arg(input)
            .args(["-filter:a", filter.as_str()])
            .args([
                "-acodec",
                "pcm_s16le",
                "-ar",
                sample_rate.as_str(),
                "-ac",
                channels.as_str(),
            ])
            .arg(output)
            .output()
            .map_err(|e| RedubError::Stretch(format!("Failed to run FFmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RedubError::Stretch(format!(
                "FFmpeg atempo failed: {}",
                last_line(&stderr)
            )));
        }

        if !output.exists() {
            return Err(RedubError::Stretch(
                "Stretched audio file was not created".to_string(),
            ));
        }

        Ok(())
    }
}

fn last_line(stderr: &str) -> &str {
    stderr.lines().last().unwrap_or("no error output").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_check_ffmpeg() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available or broken");
            return;
        }
        assert!(check_ffmpeg().is_ok());
    }

    #[test]
    fn test_atempo_filter_within_range() {
        assert_eq!(atempo_filter(1.5), "atempo=1.500000");
        assert_eq!(atempo_filter(2.0), "atempo=2.000000");
    }

    #[test]
    fn test_atempo_filter_chains_above_two() {
        assert_eq!(atempo_filter(3.0), "atempo=2.0,atempo=1.500000");
        assert_eq!(atempo_filter(5.0), "atempo=2.0,atempo=2.0,atempo=1.250000");
    }

    #[test]
    fn test_atempo_filter_chains_below_half() {
        assert_eq!(atempo_filter(0.25), "atempo=0.5,atempo=0.500000");
    }

    #[test]
    fn test_stretch_rejects_invalid_ratio() {
        let stretcher = FfmpegStretcher;
        let result = stretcher.stretch(Path::new("/tmp/in.wav"), Path::new("/tmp/out.wav"), 0.0);
        assert!(matches!(result, Err(RedubError::Stretch(_))));
    }

    #[test]
    fn test_transcode_missing_input() {
        let result = transcode_to_clip(
            Path::new("/nonexistent/clip.aiff"),
            Path::new("/tmp/out.wav"),
        );
        assert!(matches!(result, Err(RedubError::Synthesis(_))));
    }
}
