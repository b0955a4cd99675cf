use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{RedubError, Result};
use crate::media::{CLIP_CHANNELS, CLIP_SAMPLE_RATE, SAMPLES_PER_MS};

fn clip_spec() -> WavSpec {
    WavSpec {
        channels: CLIP_CHANNELS,
        sample_rate: CLIP_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Read a canonical-format clip into a sample buffer.
///
/// Clips arriving here have already been normalized by the synthesis or
/// stretch step; a mismatched spec means that step misbehaved.
pub fn load_clip(path: &Path) -> Result<Vec<i16>> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_rate != CLIP_SAMPLE_RATE || spec.channels != CLIP_CHANNELS {
        return Err(RedubError::Media(format!(
            "Unexpected clip format: {} Hz, {} channels (expected {} Hz mono)",
            spec.sample_rate, spec.channels, CLIP_SAMPLE_RATE
        )));
    }

    let samples: Vec<i16> = match spec.sample_format {
        SampleFormat::Int => reader
            .into_samples::<i16>()
            .map(|s| s.unwrap_or(0))
            .collect(),
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| (s.unwrap_or(0.0) * i16::MAX as f32) as i16)
            .collect(),
    };

    Ok(samples)
}

/// Duration of a sample buffer in whole milliseconds.
pub fn clip_duration_ms(samples: &[i16]) -> u64 {
    samples.len() as u64 / SAMPLES_PER_MS
}

/// The accumulating vocal track.
///
/// The playback position is derived from the sample count; since every
/// append is a whole number of milliseconds and 1 ms is exactly
/// `SAMPLES_PER_MS` samples, the position is always exact.
#[derive(Debug, Default)]
pub struct Track {
    samples: Vec<i16>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current end position of the track in milliseconds.
    pub fn position_ms(&self) -> u64 {
        self.samples.len() as u64 / SAMPLES_PER_MS
    }

    /// Append silence of the given duration.
    pub fn append_silence(&mut self, ms: u64) {
        let new_len = self.samples.len() + (ms * SAMPLES_PER_MS) as usize;
        self.samples.resize(new_len, 0);
    }

    /// Append an already-aligned segment.
    pub fn append_samples(&mut self, samples: &[i16]) {
        self.samples.extend_from_slice(samples);
    }

    /// Write the accumulated track as a WAV file.
    pub fn export(&self, path: &Path) -> Result<()> {
        let mut writer = WavWriter::create(path, clip_spec())?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

/// Force a segment to exactly `ms` milliseconds: truncate any excess,
/// zero-pad any shortfall.
pub fn fit_to_ms(samples: &mut Vec<i16>, ms: u64) {
    samples.resize((ms * SAMPLES_PER_MS) as usize, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_track_position() {
        let track = Track::new();
        assert_eq!(track.position_ms(), 0);
    }

    #[test]
    fn test_append_silence_advances_position() {
        let mut track = Track::new();
        track.append_silence(1500);
        assert_eq!(track.position_ms(), 1500);

        track.append_silence(500);
        assert_eq!(track.position_ms(), 2000);
    }

    #[test]
    fn test_append_samples_advances_position() {
        let mut track = Track::new();
        let segment = vec![100i16; (250 * SAMPLES_PER_MS) as usize];
        track.append_samples(&segment);
        assert_eq!(track.position_ms(), 250);
    }

    #[test]
    fn test_fit_to_ms_pads_short_segment() {
        let mut samples = vec![7i16; (800 * SAMPLES_PER_MS) as usize];
        fit_to_ms(&mut samples, 1000);
        assert_eq!(clip_duration_ms(&samples), 1000);
        // Original content preserved, tail is silence
        assert_eq!(samples[0], 7);
        assert_eq!(*samples.last().unwrap(), 0);
    }

    #[test]
    fn test_fit_to_ms_truncates_long_segment() {
        let mut samples = vec![7i16; (1200 * SAMPLES_PER_MS) as usize];
        fit_to_ms(&mut samples, 1000);
        assert_eq!(clip_duration_ms(&samples), 1000);
        assert_eq!(*samples.last().unwrap(), 7);
    }

    #[test]
    fn test_export_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.wav");

        let mut track = Track::new();
        track.append_silence(100);
        track.append_samples(&vec![42i16; (50 * SAMPLES_PER_MS) as usize]);
        track.export(&path).unwrap();

        let samples = load_clip(&path).unwrap();
        assert_eq!(clip_duration_ms(&samples), 150);
        assert_eq!(samples[0], 0);
        assert_eq!(*samples.last().unwrap(), 42);
    }
}
