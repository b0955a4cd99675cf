use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::{RedubError, Result};

/// Build the filter graph that ducks the original audio under the vocal
/// track. `duration=first` ties the mix length to the original audio stream.
fn mix_filter(background_volume: f64) -> String {
    format!(
        "[0:a]volume={background_volume}[bg];[bg][1:a]amix=inputs=2:duration=first:dropout_transition=0[aout]"
    )
}

/// Remuxes the vocal track against the original video.
///
/// The video stream is always copied, never re-encoded.
pub struct Remixer {
    background_volume: f64,
}

impl Remixer {
    pub fn new(background_volume: f64) -> Self {
        Self { background_volume }
    }

    /// Produce the final video.
    ///
    /// Primary strategy: duck the original audio to the background volume and
    /// mix the vocal track on top. When that fails (typically because the
    /// source has no audio stream to duck), fall back to remuxing the vocal
    /// track as the sole audio, trimmed to the shorter stream. A fallback
    /// failure is fatal.
    pub fn mix(&self, video: &Path, vocal: &Path, output: &Path) -> Result<()> {
        if !video.exists() {
            return Err(RedubError::FileNotFound(video.display().to_string()));
        }
        if !vocal.exists() {
            return Err(RedubError::FileNotFound(vocal.display().to_string()));
        }

        info!("Remixing {} with vocal track", video.display());

        match self.mix_with_background(video, vocal, output) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Background mix failed ({e}), remuxing vocal track alone");
                self.mix_vocal_only(video, vocal, output)
            }
        }
    }

    fn mix_with_background(&self, video: &Path, vocal: &Path, output: &Path) -> Result<()> {
        let filter = mix_filter(self.background_volume);
        debug!("amix filter: {filter}");

        let result = Command::new("ffmpeg")
            .args(["-y", "-i"])
            .arg(video)
            .arg("-i")
            .arg(vocal)
            .args(["-filter_complex", &filter])
            .args(["-map", "0:v", "-map", "[aout]"])
            .args(["-c:v", "copy", "-c:a", "aac"])
            .arg(output)
            .output()
            .map_err(|e| RedubError::Remix(format!("Failed to run FFmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RedubError::Remix(format!(
                "FFmpeg mix failed: {}",
                stderr.lines().last().unwrap_or("no error output").trim()
            )));
        }

        Ok(())
    }

    fn mix_vocal_only(&self, video: &Path, vocal: &Path, output: &Path) -> Result<()> {
        let result = Command::new("ffmpeg")
            .args(["-y", "-i"])
            .arg(video)
            .arg("-i")
            .arg(vocal)
            .args(["-map", "0:v", "-map", "1:a"])
            .args(["-c:v", "copy", "-c:a", "aac", "-shortest"])
            .arg(output)
            .output()
            .map_err(|e| RedubError::Remix(format!("Failed to run FFmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RedubError::Remix(format!(
                "FFmpeg vocal-only remux failed: {}",
                stderr.lines().last().unwrap_or("no error output").trim()
            )));
        }

        if !output.exists() {
            return Err(RedubError::Remix(
                "Output video was not created".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_filter_volume() {
        let filter = mix_filter(0.2);
        assert!(filter.starts_with("[0:a]volume=0.2[bg]"));
        assert!(filter.contains("amix=inputs=2:duration=first:dropout_transition=0"));
    }

    #[test]
    fn test_mix_filter_zero_volume() {
        let filter = mix_filter(0.0);
        assert!(filter.starts_with("[0:a]volume=0[bg]"));
    }

    #[test]
    fn test_mix_missing_inputs() {
        let remixer = Remixer::new(0.2);
        let result = remixer.mix(
            Path::new("/nonexistent/video.mp4"),
            Path::new("/nonexistent/vocal.wav"),
            Path::new("/tmp/out.mp4"),
        );
        assert!(matches!(result, Err(RedubError::FileNotFound(_))));
    }
}
