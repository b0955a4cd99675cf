pub mod ffmpeg;

pub use ffmpeg::{
    check_ffmpeg, check_ffprobe, media_duration, transcode_to_clip, FfmpegStretcher,
};

use crate::error::Result;
use std::path::Path;

/// Canonical clip format: 16-bit PCM, mono, 24 kHz.
///
/// At 24 kHz one millisecond is exactly 24 samples, so every millisecond
/// quantity converts to a whole sample count and segment boundaries never
/// accumulate rounding drift.
pub const CLIP_SAMPLE_RATE: u32 = 24_000;
pub const CLIP_CHANNELS: u16 = 1;
pub const SAMPLES_PER_MS: u64 = CLIP_SAMPLE_RATE as u64 / 1000;

/// Tempo adjustment of an audio file by an external tool.
///
/// Output duration is approximately `input_duration / ratio`; it is not
/// guaranteed to be exact, so callers must re-measure and correct.
pub trait TimeStretcher: Send + Sync {
    fn stretch(&self, input: &Path, output: &Path, ratio: f64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_per_ms_is_exact() {
        assert_eq!(CLIP_SAMPLE_RATE as u64 % 1000, 0);
        assert_eq!(SAMPLES_PER_MS, 24);
    }
}
