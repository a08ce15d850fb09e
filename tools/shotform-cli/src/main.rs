//! Shotform CLI: release-angle analysis of recorded basketball shots.
//!
//! Usage:
//!   shotform analyze <STREAM>    Analyze a recorded landmark stream
//!   shotform bands               Show a feedback band table
//!   shotform validate <STREAM>   Validate a landmark stream
//!   shotform init-config         Write the default configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use shotform_common::config::AppConfig;
use shotform_pose_model::{BoundaryPolicy, FeedbackBands, ShootingSide, WristSmoothing};

mod commands;

#[derive(Parser)]
#[command(
    name = "shotform",
    about = "Basketball shot release-angle analysis from pose landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Built-in feedback band tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandPreset {
    /// < 90 too tight, [90, 120) optimal, >= 120 too wide
    Default,
    /// Adds "slightly tight" and "slightly wide" bands
    Detailed,
}

impl BandPreset {
    pub fn bands(self) -> FeedbackBands {
        match self {
            Self::Default => FeedbackBands::standard(),
            Self::Detailed => FeedbackBands::detailed(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recorded landmark stream
    Analyze {
        /// Path to the landmark stream (.jsonl)
        stream: PathBuf,

        /// Shooting arm: right|left
        #[arg(long)]
        side: Option<ShootingSide>,

        /// Minimum landmark confidence [0.0, 1.0]
        #[arg(long)]
        confidence: Option<f64>,

        /// Minimum number of valid frames
        #[arg(long)]
        min_valid_frames: Option<usize>,

        /// Feedback band table
        #[arg(long, value_enum)]
        bands: Option<BandPreset>,

        /// Handling of a release at the first or last valid frame: degrade|reject
        #[arg(long)]
        boundary_policy: Option<BoundaryPolicy>,

        /// Wrist track smoothing: none|moving_average:<window>|gaussian[:<sigma>]
        #[arg(long)]
        smoothing: Option<WristSmoothing>,

        /// Include per-frame overlay annotations
        #[arg(long)]
        overlay: bool,

        /// Print the JSON report instead of a summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a feedback band table
    Bands {
        /// Band table to show
        #[arg(long, value_enum, default_value = "default")]
        preset: BandPreset,
    },

    /// Validate a recorded landmark stream
    Validate {
        /// Path to the landmark stream (.jsonl)
        stream: PathBuf,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    shotform_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Analyze {
            stream,
            side,
            confidence,
            min_valid_frames,
            bands,
            boundary_policy,
            smoothing,
            overlay,
            json,
            output,
        } => {
            let overrides = commands::analyze::Overrides {
                side,
                confidence,
                min_valid_frames,
                bands: bands.map(BandPreset::bands),
                boundary_policy,
                smoothing,
            };
            commands::analyze::run(&config, stream, overrides, overlay, json, output)
        }
        Commands::Bands { preset } => commands::bands::run(preset),
        Commands::Validate { stream } => commands::validate::run(stream),
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}
