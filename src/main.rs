//! # Cubelike Generator Entry Point
//!
//! Generates a dungeon from command line flags and an optional JSON config, then
//! prints it as a colored text dump or as JSON.

use clap::Parser;
use cubelike::{generate_dungeon, CubelikeResult, GenerationConfig, TextRenderer};
#[cfg(not(feature = "dev-tools"))]
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
#[cfg(feature = "dev-tools")]
use tracing::{error, info};

/// Command line arguments for the Cubelike dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "cubelike")]
#[command(about = "Constraint-driven procedural dungeon generator")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Macro grid width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Macro grid height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Distance between tile origins in cells
    #[arg(long)]
    tile_size: Option<u32>,

    /// JSON generation config; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the dungeon as JSON instead of a text dump
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> CubelikeResult<()> {
    let config = build_config(args)?;
    info!("Generating dungeon with seed {} (cubelike v{})", config.seed, cubelike::VERSION);

    let dungeon = generate_dungeon(&config)?;

    if args.json {
        println!("{}", dungeon.to_json()?);
    } else {
        let renderer = if args.no_color {
            TextRenderer {
                colored: false,
                spaced: true,
            }
        } else {
            TextRenderer::colored()
        };
        print!("{}", renderer.render(&dungeon));
        if !dungeon.degraded_tiles.is_empty() {
            eprintln!("tiles without rooms: {:?}", dungeon.degraded_tiles);
        }
    }
    Ok(())
}

/// Loads the config file, if any, and applies the command line overrides.
fn build_config(args: &Args) -> CubelikeResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.grid_width = width;
    }
    if let Some(height) = args.height {
        config.grid_height = height;
    }
    if let Some(tile_size) = args.tile_size {
        config.tile_size = tile_size;
    }

    config.validate()?;
    Ok(config)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}
