use crate::error::{RedubError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Native,
    Http,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Native => write!(f, "native"),
            Engine::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" => Ok(Engine::Native),
            "http" => Ok(Engine::Http),
            _ => Err(format!("Unknown engine: {}. Use 'native' or 'http'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            _ => Err(format!("Unknown gender: {}. Use 'female' or 'male'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Standard,
    Broadcaster,
    Gentle,
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::Standard => write!(f, "standard"),
            Style::Broadcaster => write!(f, "broadcaster"),
            Style::Gentle => write!(f, "gentle"),
        }
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Style::Standard),
            "broadcaster" => Ok(Style::Broadcaster),
            "gentle" => Ok(Style::Gentle),
            _ => Err(format!(
                "Unknown style: {}. Use 'standard', 'broadcaster', or 'gentle'",
                s
            )),
        }
    }
}

/// Engine-specific voice identifiers for one gender/style combination.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    /// macOS `say` voice name.
    pub say: &'static str,
    /// espeak-ng voice identifier.
    pub espeak: &'static str,
    /// Voice name sent to the HTTP speech endpoint.
    pub http: &'static str,
}

/// Resolve the voice identifiers for a gender/style combination.
///
/// Combinations without a dedicated voice fall back to the standard style.
pub fn voice_for(gender: Gender, style: Style) -> Voice {
    match (gender, style) {
        (Gender::Female, Style::Gentle) => Voice {
            say: "Ava",
            espeak: "en+f4",
            http: "shimmer",
        },
        (Gender::Female, _) => Voice {
            say: "Samantha",
            espeak: "en+f3",
            http: "alloy",
        },
        (Gender::Male, Style::Broadcaster) => Voice {
            say: "Daniel",
            espeak: "en+m5",
            http: "echo",
        },
        (Gender::Male, _) => Voice {
            say: "Alex",
            espeak: "en+m3",
            http: "onyx",
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_engine: Engine,
    pub http_endpoint: String,
    pub http_model: String,
    pub max_speed_ratio: f64,
    pub background_volume: f64,
    pub synthesis_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_engine: Engine::default(),
            http_endpoint: "http://127.0.0.1:9880/v1/audio/speech".to_string(),
            http_model: "cosyvoice".to_string(),
            max_speed_ratio: 1.5,
            background_volume: 0.2,
            synthesis_timeout_secs: 300,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(engine) = std::env::var("REDUB_ENGINE") {
            if let Ok(e) = engine.parse() {
                config.default_engine = e;
            }
        }
        if let Ok(endpoint) = std::env::var("REDUB_HTTP_ENDPOINT") {
            config.http_endpoint = endpoint;
        }
        if let Ok(ratio) = std::env::var("REDUB_MAX_SPEED") {
            if let Ok(r) = ratio.parse() {
                config.max_speed_ratio = r;
            }
        }
        if let Ok(volume) = std::env::var("REDUB_BACKGROUND_VOLUME") {
            if let Ok(v) = volume.parse() {
                config.background_volume = v;
            }
        }
        if let Ok(timeout) = std::env::var("REDUB_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                config.synthesis_timeout_secs = t;
            }
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_speed_ratio <= 1.0 {
            return Err(RedubError::Config(
                "max_speed_ratio must be greater than 1.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.background_volume) {
            return Err(RedubError::Config(
                "background_volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.synthesis_timeout_secs == 0 {
            return Err(RedubError::Config(
                "synthesis_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.default_engine == Engine::Http && !self.http_endpoint.starts_with("http") {
            return Err(RedubError::Config(format!(
                "Invalid HTTP endpoint: {}",
                self.http_endpoint
            )));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("redub").join("config.toml"))
    }
}
