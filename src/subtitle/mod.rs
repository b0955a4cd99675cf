pub mod srt;
pub mod vtt;

use crate::error::{RedubError, Result};
use std::path::Path;

/// One timed subtitle cue. All times are absolute milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
    pub text: String,
}

impl Cue {
    /// Build a cue from raw timing and text, returning None for entries that
    /// should be discarded (zero/negative duration or empty text).
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: &str) -> Option<Self> {
        if end_ms <= start_ms {
            return None;
        }

        let clean_text = text.replace('\n', " ").trim().to_string();
        if clean_text.is_empty() {
            return None;
        }

        Some(Self {
            index,
            start_ms,
            end_ms,
            duration_ms: end_ms - start_ms,
            text: clean_text,
        })
    }
}

/// Parse a subtitle file into an ordered cue list, dispatching on extension.
pub fn parse_subtitle_file(path: &Path) -> Result<Vec<Cue>> {
    if !path.exists() {
        return Err(RedubError::FileNotFound(path.display().to_string()));
    }

    // Tolerate non-UTF-8 subtitle files rather than failing outright.
    let bytes = std::fs::read(path)?;
    let contents = String::from_utf8_lossy(&bytes);

    match path.extension().and_then(|e| e.to_str()) {
        Some("srt") => srt::parse(&contents),
        Some("vtt") => vtt::parse(&contents),
        other => Err(RedubError::Subtitle(format!(
            "Unsupported subtitle format: {:?}. Use .srt or .vtt",
            other.unwrap_or("none")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_collapses_newlines() {
        let cue = Cue::new(1, 1000, 2500, "first line\nsecond line").unwrap();
        assert_eq!(cue.text, "first line second line");
        assert_eq!(cue.duration_ms, 1500);
    }

    #[test]
    fn test_cue_rejects_zero_duration() {
        assert!(Cue::new(1, 1000, 1000, "text").is_none());
        assert!(Cue::new(1, 2000, 1000, "text").is_none());
    }

    #[test]
    fn test_cue_rejects_empty_text() {
        assert!(Cue::new(1, 1000, 2000, "   ").is_none());
        assert!(Cue::new(1, 1000, 2000, "\n").is_none());
    }

    #[test]
    fn test_parse_subtitle_file_missing() {
        let result = parse_subtitle_file(Path::new("/nonexistent/subs.srt"));
        assert!(matches!(result, Err(RedubError::FileNotFound(_))));
    }
}
