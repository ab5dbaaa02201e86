// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Expand command - grows and traces the network of a single starting city

use super::Output;
use crate::analysis::same_region_count;
use crate::config::Config;
use crate::expand::expand_with;
use crate::graph::PowerGrid;
use crate::loader;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Run the expand command
pub fn run(config: &Config, city: &str, dot: Option<PathBuf>, output: Output) -> Result<()> {
    let dataset = loader::load(config)?;
    let grid = PowerGrid::build(&dataset.cities, &dataset.connections)
        .context("Failed to build power grid")?;

    if !grid.contains(city) {
        anyhow::bail!(
            "City '{}' is not in the selected areas: {}",
            city,
            config.areas.join(", ")
        );
    }

    let expansion = expand_with(&grid, city, config.k, config.strategy)
        .with_context(|| format!("Failed to expand from {city}"))?;
    let same_region = same_region_count(&grid, &expansion);

    if let Some(path) = dot {
        fs::write(&path, grid.to_dot(Some(&expansion)))
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        eprintln!("Graph written to {}", path.display());
    }

    if output.json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &expansion)
            .context("Failed to serialize expansion")?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }

    let title = format!(
        "Network of {} cities from {} ({})",
        config.k, expansion.start_city, expansion.start_region
    );
    if output.color {
        println!("{}", title.bold());
    } else {
        println!("{title}");
    }

    let mut running = 0;
    for (i, step) in expansion.steps.iter().enumerate() {
        running += step.weight;
        println!(
            "  {:>3}. {} -> {}  weight {}  (total {})",
            i + 1,
            step.from,
            step.to,
            step.weight,
            running
        );
    }

    println!();
    println!("Connected: {}", expansion.connected_cities.join(", "));
    println!(
        "Total cost: {}, cities in starting area: {}",
        expansion.total_cost, same_region
    );

    Ok(())
}
