use crate::config::{Config, Engine, Gender, Style};
use crate::error::{RedubError, Result};
use crate::media::{check_ffmpeg, check_ffprobe, media_duration};
use crate::remix::Remixer;
use crate::subtitle::parse_subtitle_file;
use crate::synth::create_synthesizer;
use crate::timeline::TimelineAssembler;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info};

/// Configuration for one dubbing run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Synthesis engine to use.
    pub engine: Engine,
    /// Voice gender.
    pub gender: Gender,
    /// Speaking style.
    pub style: Style,
    /// Show progress bars.
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            gender: Gender::default(),
            style: Style::default(),
            show_progress: true,
        }
    }
}

/// Statistics from one dubbing run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total time taken for the entire pipeline.
    pub total_time: Duration,
    /// Time spent synthesizing and aligning the vocal track.
    pub assembly_time: Duration,
    /// Time spent remuxing.
    pub remix_time: Duration,
    /// Number of cues parsed from the subtitle file.
    pub cue_count: usize,
    /// Cues replaced by silence after synthesis failures.
    pub dropped_cues: usize,
    /// Duration of the assembled vocal track.
    pub vocal_duration: Duration,
    /// Duration of the input video.
    pub video_duration: Duration,
    /// Engine used for synthesis.
    pub engine: String,
}

/// Result of one dubbing run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Path to the final dubbed video.
    pub output_path: PathBuf,
    /// Pipeline statistics.
    pub stats: PipelineStats,
}

/// Dub a video from a subtitle track.
///
/// This is the main entry point for the redub pipeline. It:
/// 1. Validates the input video and subtitle files
/// 2. Parses the subtitle file into timed cues
/// 3. Synthesizes each cue and assembles the aligned vocal track
/// 4. Remuxes the vocal track against the original video
///
/// The run either fully completes (producing one output video) or fully
/// fails; temporary artifacts are removed in both outcomes.
pub async fn run_dubbing(
    video: &Path,
    subtitles: &Path,
    output: &Path,
    config: &Config,
    pipeline_config: PipelineConfig,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    // Validate inputs before any processing
    if !video.exists() {
        return Err(RedubError::FileNotFound(video.display().to_string()));
    }
    if !subtitles.exists() {
        return Err(RedubError::FileNotFound(subtitles.display().to_string()));
    }

    check_ffmpeg().map_err(|_| {
        RedubError::Media(
            "FFmpeg not found. Install it with: brew install ffmpeg (macOS) or apt install ffmpeg (Linux)".to_string()
        )
    })?;
    check_ffprobe()?;

    let video_duration = media_duration(video)?;
    debug!("Input video duration: {:?}", video_duration);

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 1: Subtitle Parsing
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 1/3: Parsing subtitles from {:?}", subtitles);

    let cues = parse_subtitle_file(subtitles)?;
    if cues.is_empty() {
        return Err(RedubError::Subtitle(
            "No usable cues found in subtitle file".to_string(),
        ));
    }

    info!("Parsed {} cues", cues.len());

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 2: Synthesis and Timeline Assembly
    // ═══════════════════════════════════════════════════════════════════════
    info!(
        "Stage 2/3: Synthesizing {} cues with {} engine",
        cues.len(),
        pipeline_config.engine
    );
    let assembly_start = Instant::now();

    let temp_dir = TempDir::new()?;
    debug!("Using temp directory: {:?}", temp_dir.path());

    let synthesizer = create_synthesizer(
        pipeline_config.engine,
        pipeline_config.gender,
        pipeline_config.style,
        config,
    )?;
    let assembler = TimelineAssembler::new(synthesizer, config.max_speed_ratio);

    let progress_bar = if pipeline_config.show_progress {
        let pb = ProgressBar::new(cues.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green} {pos}/{len} cues {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    let mut update_progress = |done: usize, _total: usize| {
        if let Some(pb) = &progress_bar {
            pb.set_position(done as u64);
        }
    };

    let report = assembler
        .assemble(&cues, temp_dir.path(), Some(&mut update_progress))
        .await?;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("✓");
    }

    let assembly_time = assembly_start.elapsed();
    info!(
        "Vocal track assembled: {:.1}s audio in {:.2}s",
        report.duration.as_secs_f64(),
        assembly_time.as_secs_f64()
    );

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 3: Remix
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 3/3: Remuxing vocal track into {:?}", output);
    let remix_start = Instant::now();

    let remixer = Remixer::new(config.background_volume);
    remixer.mix(video, &report.track_path, output)?;

    let remix_time = remix_start.elapsed();
    info!("Remix complete in {:.2}s", remix_time.as_secs_f64());

    // Temp directory (per-cue clips and the vocal track) is removed when
    // `temp_dir` drops, on success and on every early return above.
    let total_time = start_time.elapsed();

    let stats = PipelineStats {
        total_time,
        assembly_time,
        remix_time,
        cue_count: cues.len(),
        dropped_cues: report.dropped_cues,
        vocal_duration: report.duration,
        video_duration,
        engine: pipeline_config.engine.to_string(),
    };

    Ok(PipelineResult {
        output_path: output.to_path_buf(),
        stats,
    })
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                        Dubbing Complete                        ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_path.display());
    println!("  Engine:     {}", result.stats.engine);
    println!(
        "  Cues:       {} ({} silent after synthesis failures)",
        result.stats.cue_count, result.stats.dropped_cues
    );
    println!(
        "  Durations:  {:.1}s video, {:.1}s vocal track",
        result.stats.video_duration.as_secs_f64(),
        result.stats.vocal_duration.as_secs_f64()
    );
    println!();
    println!("  Timing:");
    println!(
        "    Assemble:  {:.2}s",
        result.stats.assembly_time.as_secs_f64()
    );
    println!(
        "    Remix:     {:.2}s",
        result.stats.remix_time.as_secs_f64()
    );
    println!(
        "    Total:     {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
