// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Analyse command - expands from every selected city and writes the report

use super::Output;
use crate::analysis::{summarize, Analysis};
use crate::config::Config;
use crate::graph::PowerGrid;
use crate::loader;
use crate::report;
use crate::types::{AnalysisSummary, CityReport, Outcome};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Write;
use tracing::{info, warn};

/// Run the analyse command
pub fn run(config: &Config, output: Output) -> Result<()> {
    info!(
        "Analysing areas [{}] with networks of {} cities",
        config.areas.join(", "),
        config.k
    );

    let dataset = loader::load(config)?;
    if dataset.cities.is_empty() {
        warn!("No cities found in areas: {}", config.areas.join(", "));
    }

    let grid = PowerGrid::build(&dataset.cities, &dataset.connections)
        .context("Failed to build power grid")?;

    let reports = Analysis::new(config.k)
        .strategy(config.strategy)
        .parallel(config.parallel)
        .run(&dataset.cities, &grid)
        .context("Analysis aborted")?;

    let summary = summarize(&config.areas, config.k, &reports);
    let path = report::save(&config.output_dir, config.areas.len(), config.k, &reports)?;

    if output.json {
        let mut stdout = std::io::stdout().lock();
        report::write_json(&mut stdout, &summary, &reports)?;
        stdout.write_all(b"\n")?;
    } else {
        print_table(&reports, output.color);
        print_summary(&summary, output.color);
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_table(reports: &[CityReport], color: bool) {
    let width = reports.iter().map(|r| r.city.len()).max().unwrap_or(4).max(4);

    for report in reports {
        match &report.outcome {
            Outcome::Connected {
                expansion,
                same_region_count,
            } => {
                let cost = expansion.total_cost.to_string();
                let cost = if color { cost.green().to_string() } else { cost };
                println!(
                    "  {:<width$}  {:<10}  cost {:>8}  same area {:>3}",
                    report.city, report.area, cost, same_region_count
                );
            }
            Outcome::Failed { reason } => {
                let reason = if color {
                    reason.red().to_string()
                } else {
                    reason.clone()
                };
                println!("  {:<width$}  {:<10}  {}", report.city, report.area, reason);
            }
        }
    }
    println!();
}

fn print_summary(summary: &AnalysisSummary, color: bool) {
    println!(
        "{} starting cities: {} connected, {} failed",
        summary.analysed, summary.connected, summary.failed
    );
    if let Some((city, cost)) = &summary.cheapest {
        let city = if color {
            city.bold().to_string()
        } else {
            city.clone()
        };
        println!("Cheapest {}-city network starts at {} (cost {})", summary.k, city, cost);
    }
}
