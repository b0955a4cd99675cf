use anyhow::{Context, Result};
use clap::Parser;
use redub::config::{Config, Engine, Gender, Style};
use redub::interactive::run_interactive_wizard;
use redub::pipeline::{print_summary, run_dubbing, PipelineConfig};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "redub")]
#[command(version, about = "Re-dub a video from its subtitle track")]
#[command(
    long_about = "Synthesize speech for every subtitle cue, align each clip to its cue's time window, and remux the resulting vocal track over the original video with the original audio ducked as background."
)]
struct Cli {
    /// Input video file
    #[arg(required_unless_present = "interactive")]
    video: Option<PathBuf>,

    /// Subtitle file (.srt or .vtt)
    #[arg(required_unless_present = "interactive")]
    subtitles: Option<PathBuf>,

    /// Output video path (defaults to "<video stem>_dubbed.mp4")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Synthesis engine: native, http
    #[arg(short, long, default_value = "native")]
    engine: String,

    /// Voice gender: female, male
    #[arg(short, long, default_value = "female")]
    gender: String,

    /// Speaking style: standard, broadcaster, gentle
    #[arg(short, long, default_value = "standard")]
    style: String,

    /// Launch the interactive wizard
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn derive_output_path(video: &Path) -> PathBuf {
    let stem = video.file_stem().unwrap_or_default();
    let mut output = video.to_path_buf();
    output.set_file_name(format!("{}_dubbed.mp4", stem.to_string_lossy()));
    output
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let (video, subtitles, output, config, pipeline_config) = if cli.interactive {
        let wizard = run_interactive_wizard()?;
        (
            wizard.video,
            wizard.subtitles,
            wizard.output,
            wizard.config,
            wizard.pipeline_config,
        )
    } else {
        let video = cli.video.expect("clap enforces video outside --interactive");
        let subtitles = cli
            .subtitles
            .expect("clap enforces subtitles outside --interactive");

        let engine: Engine = cli.engine.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let gender: Gender = cli.gender.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let style: Style = cli.style.parse().map_err(|e: String| anyhow::anyhow!(e))?;

        let output = cli.output.unwrap_or_else(|| derive_output_path(&video));
        let config = Config::load().context("Failed to load configuration")?;

        let pipeline_config = PipelineConfig {
            engine,
            gender,
            style,
            show_progress: true,
        };

        (video, subtitles, output, config, pipeline_config)
    };

    config.validate().context("Configuration validation failed")?;

    if !video.exists() {
        anyhow::bail!("Video file not found: {}", video.display());
    }
    if !subtitles.exists() {
        anyhow::bail!("Subtitle file not found: {}", subtitles.display());
    }

    info!("Video:     {}", video.display());
    info!("Subtitles: {}", subtitles.display());
    info!("Output:    {}", output.display());
    info!("Engine:    {}", pipeline_config.engine);
    info!(
        "Voice:     {} / {}",
        pipeline_config.gender, pipeline_config.style
    );

    let result = run_dubbing(&video, &subtitles, &output, &config, pipeline_config)
        .await
        .context("Dubbing failed")?;

    print_summary(&result);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        let video = PathBuf::from("/path/to/lecture.mp4");
        assert_eq!(
            derive_output_path(&video),
            PathBuf::from("/path/to/lecture_dubbed.mp4")
        );

        let video = PathBuf::from("movie.mkv");
        assert_eq!(derive_output_path(&video), PathBuf::from("movie_dubbed.mp4"));
    }
}
