use crate::config::{Config, Engine, Gender, Style};
use crate::pipeline::PipelineConfig;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::PathBuf;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm"];
const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "vtt"];

pub struct InteractiveResult {
    pub video: PathBuf,
    pub subtitles: PathBuf,
    pub output: PathBuf,
    pub config: Config,
    pub pipeline_config: PipelineConfig,
}

pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    let config = Config::load().unwrap_or_default();

    // Step 1: Select source video
    let video = select_file("Select video file:", VIDEO_EXTENSIONS)?;

    // Step 2: Select subtitle file
    let subtitles = select_file("Select subtitle file (.srt/.vtt):", SUBTITLE_EXTENSIONS)?;

    // Step 3: Select synthesis engine
    let engine = select_engine(&config)?;

    // Step 4: Select voice
    let (gender, style_choice) = select_voice()?;

    // Derive output path
    let output = derive_output_path(&video);

    // Step 5: Confirm
    print_run_summary(&video, &subtitles, &output, engine, gender, style_choice);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    let pipeline_config = PipelineConfig {
        engine,
        gender,
        style: style_choice,
        show_progress: true,
    };

    Ok(InteractiveResult {
        video,
        subtitles,
        output,
        config,
        pipeline_config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║              redub - Video Dubbing Tool           ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn select_file(prompt: &str, extensions: &[&str]) -> anyhow::Result<PathBuf> {
    println!("\n{}", style(prompt).bold());

    let files = scan_files(".", extensions)?;

    if files.is_empty() {
        println!("  No matching files found in current directory.\n");
        let path: String = Input::new()
            .with_prompt("Enter file path")
            .interact_text()?;
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        return Ok(path);
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        let path: String = Input::new()
            .with_prompt("Enter file path")
            .interact_text()?;
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        Ok(path)
    } else {
        Ok(files[selection].clone())
    }
}

fn scan_files(dir: &str, extensions: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if extensions.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn select_engine(config: &Config) -> anyhow::Result<Engine> {
    let engines = [
        (
            "Native",
            "Offline, uses platform speech voices",
            Engine::Native,
        ),
        (
            "HTTP",
            "Local model server (best quality)",
            Engine::Http,
        ),
    ];

    let items: Vec<String> = engines
        .iter()
        .map(|(name, desc, _)| format!("{} - {}", name, desc))
        .collect();

    let default = engines
        .iter()
        .position(|(_, _, e)| *e == config.default_engine)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Select synthesis engine")
        .items(&items)
        .default(default)
        .interact()?;

    Ok(engines[selection].2)
}

fn select_voice() -> anyhow::Result<(Gender, Style)> {
    let genders = [("Female", Gender::Female), ("Male", Gender::Male)];
    let gender_items: Vec<&str> = genders.iter().map(|(name, _)| *name).collect();

    let gender_selection = Select::new()
        .with_prompt("Select voice gender")
        .items(&gender_items)
        .default(0)
        .interact()?;

    let styles = [
        ("Standard", Style::Standard),
        ("Broadcaster", Style::Broadcaster),
        ("Gentle", Style::Gentle),
    ];
    let style_items: Vec<&str> = styles.iter().map(|(name, _)| *name).collect();

    let style_selection = Select::new()
        .with_prompt("Select speaking style")
        .items(&style_items)
        .default(0)
        .interact()?;

    Ok((genders[gender_selection].1, styles[style_selection].1))
}

fn derive_output_path(video: &PathBuf) -> PathBuf {
    let stem = video.file_stem().unwrap_or_default();
    let mut output = video.clone();
    output.set_file_name(format!("{}_dubbed.mp4", stem.to_string_lossy()));
    output
}

fn print_run_summary(
    video: &PathBuf,
    subtitles: &PathBuf,
    output: &PathBuf,
    engine: Engine,
    gender: Gender,
    style_choice: Style,
) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Video:     {}", style(video.display()).cyan());
    println!("  Subtitles: {}", style(subtitles.display()).cyan());
    println!("  Output:    {}", style(output.display()).cyan());
    println!("  Engine:    {}", engine);
    println!("  Voice:     {} / {}", gender, style_choice);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_derive_output_path() {
        let video = PathBuf::from("/path/to/clip.mp4");
        assert_eq!(
            derive_output_path(&video),
            PathBuf::from("/path/to/clip_dubbed.mp4")
        );
    }
}
