use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{RedubError, Result};
use crate::media::{FfmpegStretcher, TimeStretcher};
use crate::subtitle::Cue;
use crate::synth::SpeechSynthesizer;

use super::track::{clip_duration_ms, fit_to_ms, load_clip, Track};

/// How a raw clip is made to fit its cue window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentPlan {
    /// Clip fits; append and fill the remainder with silence.
    Pad { silence_ms: u64 },
    /// Clip is too long but fits after tempo compression by the exact ratio.
    Stretch { ratio: f64 },
    /// Clip cannot fit even at maximum speed; compress by the ceiling and
    /// truncate the tail. Lossy on purpose.
    CappedStretch { ratio: f64 },
}

/// Decide the alignment strategy for a raw clip against its cue window.
pub fn plan_alignment(raw_ms: u64, target_ms: u64, max_speed_ratio: f64) -> AlignmentPlan {
    if raw_ms <= target_ms {
        return AlignmentPlan::Pad {
            silence_ms: target_ms - raw_ms,
        };
    }

    let ratio = raw_ms as f64 / target_ms as f64;
    if ratio <= max_speed_ratio {
        AlignmentPlan::Stretch { ratio }
    } else {
        AlignmentPlan::CappedStretch {
            ratio: max_speed_ratio,
        }
    }
}

/// Outcome of one assembly pass.
#[derive(Debug)]
pub struct AssemblyReport {
    /// Path of the exported vocal track WAV.
    pub track_path: PathBuf,
    /// Total track duration.
    pub duration: Duration,
    /// Cues whose synthesized audio made it onto the track.
    pub synthesized_cues: usize,
    /// Cues replaced by silence after a synthesis failure.
    pub dropped_cues: usize,
}

/// Builds one continuous vocal track from ordered cues.
///
/// A single left-to-right pass: for each cue, fill any gap with silence,
/// synthesize the line, then pad, stretch, or truncate the clip so the
/// appended segment is exactly the cue's duration. The track position after
/// cue *i* always equals `cue[i].end_ms`.
pub struct TimelineAssembler {
    synthesizer: Box<dyn SpeechSynthesizer>,
    stretcher: Box<dyn TimeStretcher>,
    max_speed_ratio: f64,
}

impl TimelineAssembler {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, max_speed_ratio: f64) -> Self {
        Self {
            synthesizer,
            stretcher: Box::new(FfmpegStretcher),
            max_speed_ratio,
        }
    }

    /// Replace the FFmpeg-backed stretcher.
    pub fn with_stretcher(mut self, stretcher: Box<dyn TimeStretcher>) -> Self {
        self.stretcher = stretcher;
        self
    }

    /// Run the assembly pass. Per-cue temp files are written into `temp_dir`;
    /// filenames derive from cue indices, so the directory must not be shared
    /// by concurrent runs.
    ///
    /// Synthesis failures are absorbed (the cue's window stays silent); a
    /// stretch failure aborts the whole pass.
    pub async fn assemble(
        &self,
        cues: &[Cue],
        temp_dir: &Path,
        mut progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> Result<AssemblyReport> {
        let mut track = Track::new();
        let mut dropped_cues = 0;
        let total = cues.len();

        info!("Assembling vocal track from {total} cues");

        for (done, cue) in cues.iter().enumerate() {
            // Gap before this cue stays silent so absolute timing holds even
            // when cues are sparse.
            if cue.start_ms > track.position_ms() {
                track.append_silence(cue.start_ms - track.position_ms());
            }

            if !self.render_cue(cue, temp_dir, &mut track).await? {
                // Dropped from the audio but not from the timeline.
                track.append_silence(cue.duration_ms);
                dropped_cues += 1;
            }

            debug!(
                "Cue {}: track position {} ms (cue ends at {} ms)",
                cue.index,
                track.position_ms(),
                cue.end_ms
            );

            if let Some(cb) = progress.as_mut() {
                cb(done + 1, total);
            }
        }

        let track_path = temp_dir.join("vocal_track.wav");
        track.export(&track_path)?;

        let duration = Duration::from_millis(track.position_ms());
        info!(
            "Vocal track complete: {:.1}s, {} cues dropped",
            duration.as_secs_f64(),
            dropped_cues
        );

        Ok(AssemblyReport {
            track_path,
            duration,
            synthesized_cues: total - dropped_cues,
            dropped_cues,
        })
    }

    /// Synthesize and append one cue. Returns Ok(false) when the cue could
    /// not be synthesized and the caller should substitute silence.
    async fn render_cue(&self, cue: &Cue, temp_dir: &Path, track: &mut Track) -> Result<bool> {
        let clip_path = temp_dir.join(format!("clip_{:04}.wav", cue.index));

        if let Err(e) = self.synthesizer.generate(&cue.text, &clip_path).await {
            warn!("Synthesis failed for cue {}: {e}", cue.index);
            return Ok(false);
        }

        let raw = match load_clip(&clip_path) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Unreadable clip for cue {}: {e}", cue.index);
                return Ok(false);
            }
        };

        let raw_ms = clip_duration_ms(&raw);
        let target_ms = cue.duration_ms;

        let mut segment = match plan_alignment(raw_ms, target_ms, self.max_speed_ratio) {
            AlignmentPlan::Pad { silence_ms } => {
                debug!("Cue {}: pad with {silence_ms} ms of silence", cue.index);
                raw
            }
            AlignmentPlan::Stretch { ratio } | AlignmentPlan::CappedStretch { ratio } => {
                let stretched_path = temp_dir.join(format!("clip_{:04}_stretched.wav", cue.index));
                self.stretcher.stretch(&clip_path, &stretched_path, ratio)?;

                load_clip(&stretched_path).map_err(|e| {
                    RedubError::Stretch(format!(
                        "Unreadable stretched clip for cue {}: {e}",
                        cue.index
                    ))
                })?
            }
        };

        // The stretch tool is only approximately accurate; whatever branch
        // ran, force the segment to the exact cue duration.
        fit_to_ms(&mut segment, target_ms);
        track.append_samples(&segment);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_pad_when_clip_fits() {
        assert_eq!(
            plan_alignment(800, 1000, 1.5),
            AlignmentPlan::Pad { silence_ms: 200 }
        );
    }

    #[test]
    fn test_plan_pad_on_exact_fit() {
        assert_eq!(
            plan_alignment(1000, 1000, 1.5),
            AlignmentPlan::Pad { silence_ms: 0 }
        );
    }

    #[test]
    fn test_plan_proportional_stretch() {
        let plan = plan_alignment(1200, 1000, 1.5);
        match plan {
            AlignmentPlan::Stretch { ratio } => assert!((ratio - 1.2).abs() < 1e-9),
            other => panic!("Expected Stretch, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_stretch_at_exact_cap() {
        let plan = plan_alignment(1500, 1000, 1.5);
        match plan {
            AlignmentPlan::Stretch { ratio } => assert!((ratio - 1.5).abs() < 1e-9),
            other => panic!("Expected Stretch, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_capped_stretch_above_cap() {
        // 3000 ms into a 1000 ms window at a 1.5x cap: compress to 2000 ms,
        // then the tail past 1000 ms is discarded.
        let plan = plan_alignment(3000, 1000, 1.5);
        match plan {
            AlignmentPlan::CappedStretch { ratio } => assert!((ratio - 1.5).abs() < 1e-9),
            other => panic!("Expected CappedStretch, got {other:?}"),
        }
    }
}
