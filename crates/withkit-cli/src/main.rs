//! WithKit CLI - Build and inspect a WithKit child theme

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{build, enqueue, entries, resolve, watch};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use withkit_core::{BuildMode, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "withkit")]
#[command(about = "Asset pipeline and registration inspector for WithKit child themes", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the theme config file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile entries, write manifests, run production transforms
    Build {
        /// Build mode (production or development)
        #[arg(long)]
        mode: Option<BuildMode>,
    },

    /// Build, then rebuild whenever the source tree changes
    Watch {
        /// Build mode (defaults to development)
        #[arg(long)]
        mode: Option<BuildMode>,
    },

    /// Show how a theme-relative asset path resolves
    Resolve {
        /// Path relative to the theme root (e.g., build/css/global.css)
        relative: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run every registration phase and print the host calls
    Enqueue {
        /// Simulate an admin request
        #[arg(long)]
        admin: bool,

        /// Simulate the block editor (implies --admin)
        #[arg(long)]
        editor: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List the discovered build entries
    Entries {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { mode } => build::run(&cli.config, mode),
        Commands::Watch { mode } => watch::run(&cli.config, mode),
        Commands::Resolve { relative, format } => resolve::run(&cli.config, &relative, &format),
        Commands::Enqueue {
            admin,
            editor,
            format,
        } => enqueue::run(&cli.config, admin, editor, &format),
        Commands::Entries { format } => entries::run(&cli.config, &format),
    }
}
