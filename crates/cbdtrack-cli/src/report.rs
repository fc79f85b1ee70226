//! Report command implementation.
//!
//! Runs one load (from the feed or a local CSV) and prints the analytics
//! as plain text, for use without a browser.

use std::path::Path;

use cbdtrack_core::{analytics, loader};

use crate::colors;

/// Load the feed once and print a summary report.
pub async fn execute(url: &str, input: Option<&Path>) -> anyhow::Result<()> {
    let dataset = match input {
        Some(path) => loader::load_file(path)?,
        None => loader::fetch_dataset(url).await?,
    };

    let summary = analytics::summarize(&dataset);
    println!(
        "\n{}CBD Novel Food Applications{}",
        colors::BOLD,
        colors::RESET
    );
    println!("{}", "─".repeat(50));
    println!("  applications: {}", summary.applications);
    println!("  companies:    {}", summary.companies);
    if let Some(date) = summary.last_updated {
        println!("  last updated: {}", date.format("%d/%m/%y"));
    }

    let top = analytics::top_manufacturers(&dataset);
    println!(
        "\n{}Top companies by applications{}",
        colors::BOLD,
        colors::RESET
    );
    for entry in &top.entries {
        println!("  {:>4}  {}", entry.count, entry.label);
    }
    if !top.entries.is_empty() {
        println!(
            "  {}covering {:.1}% of all applications{}",
            colors::DIM,
            top.share_pct,
            colors::RESET
        );
    }

    let validated = analytics::top_validated_manufacturers(&dataset);
    println!(
        "\n{}Top companies by validated applications{}",
        colors::BOLD,
        colors::RESET
    );
    for entry in &validated.entries {
        println!("  {:>4}  {}", entry.count, entry.label);
    }
    if !validated.entries.is_empty() {
        println!(
            "  {}covering {:.1}% of {} validated applications{}",
            colors::DIM,
            validated.share_pct,
            validated.total,
            colors::RESET
        );
    }

    println!("\n{}Product categories{}", colors::BOLD, colors::RESET);
    for entry in analytics::category_distribution(&dataset) {
        println!("  {:>4}  {}", entry.count, entry.label);
    }

    let doses = analytics::dose_distribution(&dataset);
    if let Some(mg) = doses.most_common_mg {
        println!(
            "\n{}Most common dosage:{} {}mg",
            colors::BOLD,
            colors::RESET,
            mg
        );
    }

    println!("\n{}Completion projection{}", colors::BOLD, colors::RESET);
    match analytics::completion_projection(&dataset) {
        Some(projection) => {
            println!(
                "  {} applications remaining over a {}-day span",
                projection.remaining, projection.elapsed_days
            );
            println!(
                "  {}all applications processed by{} {}",
                colors::GREEN,
                colors::RESET,
                projection.predicted_finish.format("%d/%m/%y")
            );
        }
        None => println!(
            "  {}insufficient data to project a completion date{}",
            colors::YELLOW,
            colors::RESET
        ),
    }
    println!();

    Ok(())
}
