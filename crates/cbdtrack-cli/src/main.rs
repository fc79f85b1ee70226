//! cbdtrack CLI - live tracker for UK CBD novel food applications.

mod classify;
mod colors;
mod report;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cbdtrack_core::loader::DEFAULT_SOURCE_URL;

#[derive(Parser)]
#[command(name = "cbdtrack")]
#[command(about = "Live tracker for UK CBD novel food applications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the live dashboard
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Feed URL to poll
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        url: String,

        /// Minutes between refresh cycles
        #[arg(long, default_value = "15")]
        interval_mins: u64,

        /// Disable the background refresher
        #[arg(long)]
        no_refresh: bool,
    },

    /// Fetch the feed once and print a summary report
    Report {
        /// Feed URL to fetch
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        url: String,

        /// Read a local feed CSV instead of fetching
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Categorize product names from the command line
    Classify {
        /// Product names to classify
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            url,
            interval_mins,
            no_refresh,
        } => {
            serve::execute(host, port, url, interval_mins, !no_refresh).await?;
        }

        Commands::Report { url, input } => {
            report::execute(&url, input.as_deref()).await?;
        }

        Commands::Classify { names } => classify::execute(&names),
    }

    Ok(())
}
