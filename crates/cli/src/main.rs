//! OrderDesk CLI — the main entry point.
//!
//! Commands:
//! - `onboard`   — Initialize config
//! - `status`    — Show effective configuration
//! - `customers` — List customers in an order extract
//! - `ask`       — Answer one question and exit
//! - `chat`      — Interactive question/answer session

use clap::{Parser, Subcommand};
use orderdesk_config::AppConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "orderdesk",
    about = "OrderDesk — Backlog & Dispatch Assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Show effective configuration
    Status,

    /// List the customers in an order extract
    Customers {
        /// Order extract (.csv or .xlsx)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Ask one question about a customer
    Ask {
        /// Order extract (.csv or .xlsx)
        #[arg(short, long)]
        file: PathBuf,

        /// Customer identifier (case-insensitive)
        #[arg(short, long)]
        customer: String,

        /// Backlog, MTD or "Backlog & MTD" (defaults to config)
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Interactive session over one order extract
    Chat {
        /// Order extract (.csv or .xlsx)
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = AppConfig::load().map_err(orderdesk_core::Error::from)?;

    // Initialize tracing
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Status => commands::status::run(&config).await?,
        Commands::Customers { file } => commands::customers::run(&config, &file).await?,
        Commands::Ask {
            file,
            customer,
            metric,
        } => commands::ask::run(&config, &file, &customer, metric.as_deref()).await?,
        Commands::Chat { file } => commands::chat::run(&config, &file).await?,
    }

    Ok(())
}
