//! vidview CLI - headless driver for the native video binding
//!
//! Features:
//! - Render host props into the native configuration
//! - Classify source URIs
//! - List the event vocabulary
//! - Replay recorded native event streams against a view

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vidview_core::Platform;

mod commands;
mod output;

/// vidview CLI - native video view toolkit
#[derive(Parser)]
#[command(name = "vidview-cli")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Headless driver for the vidview native video binding", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json, table)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render props into the native configuration
    Render {
        /// Path to props JSON
        props: PathBuf,

        /// Target platform (ios, android, windows, web)
        #[arg(short, long, default_value = "ios")]
        platform: Platform,
    },

    /// Classify source URIs
    Classify {
        /// URIs to classify
        #[arg(required = true)]
        uris: Vec<String>,
    },

    /// List host events and their native names
    Events,

    /// Replay a native event stream against a view
    Replay {
        /// Path to props JSON
        props: PathBuf,

        /// Path to events JSON (array of {name, body})
        events: PathBuf,

        /// Target platform (ios, android, windows, web)
        #[arg(short, long, default_value = "ios")]
        platform: Platform,

        /// License returned for every license request
        #[arg(short, long)]
        license: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .init();

    let format = output::OutputFormat::from(cli.format.as_str());

    match cli.command {
        Commands::Render { props, platform } => {
            commands::render(&props, platform, format)?;
        }
        Commands::Classify { uris } => {
            commands::classify(&uris, format)?;
        }
        Commands::Events => {
            commands::events(format)?;
        }
        Commands::Replay { props, events, platform, license } => {
            commands::replay(&props, &events, platform, license, format).await?;
        }
    }

    Ok(())
}
