use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::{voice_for, Gender, Style};
use crate::error::{RedubError, Result};
use crate::media::transcode_to_clip;
use crate::synth::SpeechSynthesizer;

/// Speech synthesis over an OpenAI-style `/v1/audio/speech` endpoint, as
/// served by local CosyVoice-compatible model servers.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    voice: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

impl HttpSynthesizer {
    /// Create a client for the given endpoint. Model servers can take minutes
    /// per request, so the timeout is generous and configurable.
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            model,
            voice: voice_for(Gender::default(), Style::default()).http.to_string(),
        })
    }

    /// Select the voice for a gender/style combination.
    pub fn with_voice(mut self, gender: Gender, style: Style) -> Self {
        self.voice = voice_for(gender, style).http.to_string();
        self
    }

    /// Download synthesized audio to `output` without format normalization.
    pub async fn fetch(&self, text: &str, output: &Path) -> Result<()> {
        let payload = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            response_format: "wav",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                RedubError::Synthesis(format!(
                    "Could not reach speech endpoint {} (is the server running?): {e}",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        debug!("Speech endpoint response status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Char-based truncation; the body may be non-ASCII
            let snippet: String = body.chars().take(200).collect();
            return Err(RedubError::Synthesis(format!(
                "Speech endpoint error ({status}): {snippet}"
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(RedubError::Synthesis(
                "Speech endpoint returned an empty body".to_string(),
            ));
        }

        tokio::fs::write(output, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn generate(&self, text: &str, output: &Path) -> Result<()> {
        debug!("HTTP synthesis: {:?}", text);

        let raw_path = output.with_extension("download.wav");
        self.fetch(text, &raw_path).await?;

        let result = transcode_to_clip(&raw_path, output);
        if let Err(e) = std::fs::remove_file(&raw_path) {
            debug!("Could not remove downloaded audio file: {e}");
        }
        result
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
