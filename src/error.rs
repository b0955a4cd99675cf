use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedubError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Time-stretch failed: {0}")]
    Stretch(String),

    #[error("Remix failed: {0}")]
    Remix(String),

    #[error("Media tool error: {0}")]
    Media(String),

    #[error("Subtitle parsing failed: {0}")]
    Subtitle(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, RedubError>;
