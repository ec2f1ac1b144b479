mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "calcraft")]
#[command(about = "CalCraft calendar page composer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an ICS file and list its events
    Events {
        /// Path to the .ics file
        #[arg(short, long)]
        file: String,

        /// Print machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the grid layout of one month
    Grid {
        /// Month, 1-12
        #[arg(short, long)]
        month: u32,

        /// Calendar year
        #[arg(short, long)]
        year: i32,

        /// Row policy: 0 = standard weekly grid, N = forced N rows
        #[arg(short, long, default_value = "0")]
        rows: u32,
    },

    /// Compose a year of month pages and export them as JSON documents
    Compose {
        /// Calendar year
        #[arg(short, long)]
        year: i32,

        /// ICS file to overlay onto the pages (repeatable)
        #[arg(short, long)]
        ics: Vec<String>,

        /// Row policy passed to the grid engine
        #[arg(short, long, default_value = "0")]
        rows: u32,

        /// Output directory for the page documents
        #[arg(short, long, default_value = ".")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("calcraft_cli={log_level},calcraft_core={log_level}").into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Events { file, json } => commands::events_command(file, json).await,

        Commands::Grid { month, year, rows } => commands::grid_command(month, year, rows).await,

        Commands::Compose {
            year,
            ics,
            rows,
            output,
        } => {
            commands::compose_command(commands::ComposeParams {
                year,
                ics,
                rows,
                output,
            })
            .await
        }
    }
}
