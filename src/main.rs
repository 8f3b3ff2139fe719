use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use deadcase_director::{config::Config, error::DirectorError, pipeline};

#[derive(Parser)]
#[command(
    name = "deadcase",
    version,
    about = "Offline shot detection and edit-map generation",
    long_about = "Deadcase splits footage into shots, measures how dark and how restless each shot is, and turns those measurements into a time-sorted map of cuts, glitches, shakes, flashes and markers for an editor to act on."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect shots in a video file or a directory of frame images
    Analyze {
        /// Video file, or directory of numbered frame images
        #[arg(short, long)]
        input: PathBuf,

        /// Output shots JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Histogram dissimilarity above which a cut is declared
        #[arg(long)]
        threshold: Option<f64>,

        /// Shortest allowed shot, in seconds
        #[arg(long)]
        min_shot_duration: Option<f64>,

        /// Frame rate to assume instead of the one the source declares
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Turn a shots file into an edit map
    Direct {
        /// Shots JSON file written by `analyze`
        #[arg(long)]
        shots: PathBuf,

        /// Output edit map JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Style preset (horror_truecrime, analog_horror)
        #[arg(short, long)]
        style: Option<String>,

        /// Seconds between periodic beat markers
        #[arg(long)]
        beat_interval: Option<f64>,
    },

    /// Plan coloured timeline markers from an edit map
    Markers {
        /// Edit map JSON file written by `direct`
        #[arg(short, long)]
        edits: PathBuf,

        /// Output markers JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Frame rate of the target timeline
        #[arg(long)]
        fps: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose; logs go to stderr so stdout stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting deadcase v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Analyze { input, output, threshold, min_shot_duration, fps } => {
            if let Some(threshold) = threshold {
                config.analysis.cut_threshold = threshold;
            }
            if let Some(min_shot_duration) = min_shot_duration {
                config.analysis.min_shot_duration = min_shot_duration;
            }
            config.validate()?;
            analyze(&input, &output, fps, config).await
        }
        Command::Direct { shots, output, style, beat_interval } => {
            if let Some(style) = style {
                config.director.style = style;
            }
            if let Some(beat_interval) = beat_interval {
                config.director.beat_interval = beat_interval;
            }
            config.validate()?;
            direct(&shots, &output, config).await
        }
        Command::Markers { edits, output, fps } => {
            if let Some(fps) = fps {
                config.timeline.project_fps = fps;
            }
            config.validate()?;
            markers(&edits, &output, config).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Ok(Config::from_file(path)?)
        }
        None => {
            debug!("Using default configuration");
            Ok(Config::default())
        }
    }
}

async fn analyze(input: &Path, output: &Path, fps: Option<f64>, config: Config) -> Result<()> {
    let written = pipeline::analyze(input, output, fps, &config.analysis).await?;

    println!("Wrote {} shots to {}", written, output.display());
    Ok(())
}

async fn direct(shots: &Path, output: &Path, config: Config) -> Result<()> {
    let summary = pipeline::direct(shots, output, &config.director).await?;

    if summary.shots == 0 {
        eprintln!("No shots available; generated an empty edit map.");
        return Ok(());
    }

    println!("Generated {} edit events to {}", summary.events, output.display());
    Ok(())
}

async fn markers(edits: &Path, output: &Path, config: Config) -> Result<()> {
    let planned = pipeline::plan(edits, output, config.timeline.project_fps).await?;

    println!("Planned {} markers from {}", planned, edits.display());
    Ok(())
}

/// One diagnostic line for a failed run
fn diagnostic(err: &anyhow::Error) -> String {
    match err.downcast_ref::<DirectorError>() {
        Some(e) if e.is_empty_result() => "No frames detected; no shots generated.".to_string(),
        Some(e) => e.user_message(),
        None => format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deadcase_director::error::InputError;

    #[test]
    fn test_empty_analysis_has_its_own_diagnostic() {
        let err = anyhow::Error::from(DirectorError::from(InputError::Empty { path: "clip.mp4".into() }));
        assert_eq!(diagnostic(&err), "No frames detected; no shots generated.");
    }

    #[test]
    fn test_missing_input_diagnostic_names_the_path() {
        let err = anyhow::Error::from(DirectorError::from(InputError::NotFound { path: "clip.mp4".into() }));
        assert_eq!(diagnostic(&err), "Input not found: clip.mp4");
    }
}
