//! flowsteer CLI: annotate videos with turning direction from optical flow.
//!
//! Usage:
//!   flowsteer annotate <INPUT> <OUTPUT>   Annotate every frame of a video
//!   flowsteer classify --dx <DX> --dy <DY> Classify a single motion vector
//!   flowsteer inspect <FLO>...             Classify precomputed .flo fields
//!   flowsteer config                       Show or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flowsteer_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "flowsteer",
    about = "Label video motion as straight, left or right turns from dense optical flow",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/flowsteer/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a video with direction and angle per frame
    Annotate {
        /// Input video file
        input: PathBuf,

        /// Output video file
        output: PathBuf,

        /// Minimum horizontal displacement (pixels) before a turn is reported
        #[arg(long)]
        threshold: Option<f64>,

        /// Four-character output codec code
        #[arg(long)]
        fourcc: Option<String>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Classify a single mean motion vector
    Classify {
        /// Horizontal displacement
        #[arg(long, allow_hyphen_values = true)]
        dx: f64,

        /// Vertical displacement
        #[arg(long, allow_hyphen_values = true)]
        dy: f64,

        /// Minimum horizontal displacement before a turn is reported
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Aggregate and classify precomputed Middlebury .flo fields
    Inspect {
        /// One or more .flo files, classified in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Minimum horizontal displacement before a turn is reported
        #[arg(long)]
        threshold: Option<f64>,

        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the defaults to the standard config location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    flowsteer_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Annotate {
            input,
            output,
            threshold,
            fourcc,
            report,
        } => commands::annotate::run(config, input, output, threshold, fourcc, report).await,
        Commands::Classify {
            dx,
            dy,
            threshold,
            json,
        } => commands::classify::run(&config, dx, dy, threshold, json),
        Commands::Inspect {
            paths,
            threshold,
            json,
        } => commands::inspect::run(&config, paths, threshold, json),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
