//! Serve command implementation.
//!
//! Starts the dashboard server with the background refresher.

use std::time::Duration;

use cbdtrack_server::ServerConfig;

use crate::colors;

/// Start the dashboard server.
pub async fn execute(
    host: String,
    port: u16,
    url: String,
    interval_mins: u64,
    refresh_enabled: bool,
) -> anyhow::Result<()> {
    let config = ServerConfig {
        host,
        port,
        source_url: url,
        refresh_interval: Duration::from_secs(interval_mins * 60),
        refresh_enabled,
    };

    println!(
        "\n{}CBD Applications Tracker{} - Live Dashboard",
        colors::BOLD,
        colors::RESET
    );
    println!("{}", "─".repeat(50));
    println!(
        "{}  ◆ Dashboard:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!(
        "{}  ◆ Feed:{} {}",
        colors::CYAN,
        colors::RESET,
        config.source_url
    );
    if config.refresh_enabled {
        println!(
            "{}  ◆ Refresh:{} every {} minutes",
            colors::CYAN,
            colors::RESET,
            interval_mins
        );
    } else {
        println!(
            "{}  ◆ Refresh:{} {}disabled{}",
            colors::CYAN,
            colors::RESET,
            colors::DIM,
            colors::RESET
        );
    }
    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    cbdtrack_server::serve(config).await?;

    Ok(())
}
