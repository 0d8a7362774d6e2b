//! Slidecut CLI — Render vertical slideshow videos with chained transitions.
//!
//! Usage:
//!   slidecut render <IMAGES>... -o <OUT>   Render images into a video
//!   slidecut templates                     List transition templates
//!   slidecut demo                          Render generated placeholder images
//!   slidecut check                         Check encoder availability
//!   slidecut init-config                   Write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slidecut_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "slidecut",
    about = "Turn a set of still images into a vertical video with transitions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/slidecut/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render images into a video
    Render {
        /// Input images, in display order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Template: classic|slide|mix|random (random choice if omitted)
        #[arg(short, long)]
        template: Option<String>,

        /// Explicit comma-separated transitions, overriding --template
        #[arg(long)]
        transitions: Option<String>,

        /// Seed for template selection
        #[arg(long)]
        seed: Option<u64>,

        /// Seconds per image
        #[arg(long)]
        segment_secs: Option<f64>,

        /// Seconds per transition
        #[arg(long)]
        transition_secs: Option<f64>,
    },

    /// List transition templates and their plans
    Templates {
        /// Seed for the random template
        #[arg(long)]
        seed: Option<u64>,

        /// Print plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render generated placeholder images
    Demo {
        /// Output file path
        #[arg(short, long, default_value = "slidecut-demo.mp4")]
        output: PathBuf,

        /// Template: classic|slide|mix|random
        #[arg(short, long)]
        template: Option<String>,

        /// Seed for template selection
        #[arg(long)]
        seed: Option<u64>,

        /// Keep the job working directory
        #[arg(long)]
        keep_workdir: bool,
    },

    /// Check encoder availability
    Check,

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    slidecut_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Render {
            images,
            output,
            template,
            transitions,
            seed,
            segment_secs,
            transition_secs,
        } => {
            commands::render::run(
                &config,
                images,
                output,
                template,
                transitions,
                seed,
                segment_secs,
                transition_secs,
            )
            .await
        }
        Commands::Templates { seed, json } => commands::templates::run(&config, seed, json),
        Commands::Demo {
            output,
            template,
            seed,
            keep_workdir,
        } => commands::demo::run(&config, output, template, seed, keep_workdir).await,
        Commands::Check => commands::check::run(&config, cli.config.as_deref()),
        Commands::InitConfig { force } => commands::init_config::run(cli.config, force),
    }
}
