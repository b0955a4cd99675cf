use std::path::Path;
use std::process::Command;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{voice_for, Gender, Style, Voice};
use crate::error::{RedubError, Result};
use crate::media::transcode_to_clip;
use crate::synth::SpeechSynthesizer;

/// Default speaking rate in words per minute.
const DEFAULT_RATE: u32 = 180;

/// Offline synthesis through the platform speech command.
///
/// Uses `say` on macOS (AIFF output, transcoded to the clip format) and
/// `espeak-ng`/`espeak` elsewhere.
pub struct NativeSynthesizer {
    voice: Voice,
    rate: u32,
}

impl NativeSynthesizer {
    pub fn new(gender: Gender, style: Style) -> Self {
        Self {
            voice: voice_for(gender, style),
            rate: DEFAULT_RATE,
        }
    }

    /// Set the speaking rate in words per minute.
    pub fn with_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    fn generate_say(&self, text: &str, output: &Path) -> Result<()> {
        let aiff_path = output.with_extension("aiff");

        let status = Command::new("say")
            .args(["-v", self.voice.say, "-r", &self.rate.to_string(), "-o"])
            .arg(&aiff_path)
            .arg(text)
            .status()
            .map_err(|e| RedubError::Synthesis(format!("Failed to run say: {e}")))?;

        if !status.success() {
            return Err(RedubError::Synthesis(format!(
                "say exited with status: {status}"
            )));
        }

        let result = transcode_to_clip(&aiff_path, output);
        if let Err(e) = std::fs::remove_file(&aiff_path) {
            debug!("Could not remove intermediate AIFF file: {e}");
        }
        result
    }

    fn generate_espeak(&self, text: &str, output: &Path) -> Result<()> {
        let raw_path = output.with_extension("raw.wav");

        // espeak-ng is the maintained fork; fall back to classic espeak.
        let status = run_espeak("espeak-ng", self.voice.espeak, self.rate, text, &raw_path)
            .or_else(|e| {
                warn!("espeak-ng not usable ({e}), trying espeak");
                run_espeak("espeak", self.voice.espeak, self.rate, text, &raw_path)
            })?;

        if !status.success() {
            return Err(RedubError::Synthesis(format!(
                "espeak exited with status: {status}"
            )));
        }

        let result = transcode_to_clip(&raw_path, output);
        if let Err(e) = std::fs::remove_file(&raw_path) {
            debug!("Could not remove intermediate WAV file: {e}");
        }
        result
    }
}

fn run_espeak(
    binary: &str,
    voice: &str,
    rate: u32,
    text: &str,
    output: &Path,
) -> Result<std::process::ExitStatus> {
    Command::new(binary)
        .args(["-v", voice, "-s", &rate.to_string(), "-w"])
        .arg(output)
        .arg(text)
        .status()
        .map_err(|e| RedubError::Synthesis(format!("Failed to run {binary}: {e}")))
}

#[async_trait]
impl SpeechSynthesizer for NativeSynthesizer {
    async fn generate(&self, text: &str, output: &Path) -> Result<()> {
        debug!("Native synthesis: {:?}", text);

        if cfg!(target_os = "macos") {
            self.generate_say(text, output)
        } else {
            self.generate_espeak(text, output)
        }
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_synthesizer_voice_selection() {
        let synthesizer = NativeSynthesizer::new(Gender::Male, Style::Broadcaster);
        assert_eq!(synthesizer.voice.say, "Daniel");
        assert_eq!(synthesizer.rate, DEFAULT_RATE);
    }

    #[test]
    fn test_native_synthesizer_with_rate() {
        let synthesizer = NativeSynthesizer::new(Gender::Female, Style::Standard).with_rate(150);
        assert_eq!(synthesizer.rate, 150);
    }
}
