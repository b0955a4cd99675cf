pub mod http;
pub mod native;

pub use http::HttpSynthesizer;
pub use native::NativeSynthesizer;

use crate::config::{Config, Engine, Gender, Style};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// A speech synthesis backend.
///
/// `generate` writes a canonical-format WAV (16-bit mono 24 kHz) to
/// `output`. Any failure is recovered by the caller with silence, so
/// implementations report errors rather than panicking.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn generate(&self, text: &str, output: &Path) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Build the synthesizer selected by configuration.
pub fn create_synthesizer(
    engine: Engine,
    gender: Gender,
    style: Style,
    config: &Config,
) -> Result<Box<dyn SpeechSynthesizer>> {
    match engine {
        Engine::Native => Ok(Box::new(NativeSynthesizer::new(gender, style))),
        Engine::Http => {
            let synthesizer = HttpSynthesizer::new(
                config.http_endpoint.clone(),
                config.http_model.clone(),
                Duration::from_secs(config.synthesis_timeout_secs),
            )?
            .with_voice(gender, style);
            Ok(Box::new(synthesizer))
        }
    }
}
