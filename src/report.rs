// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Report serialization - CSV rows per starting city, or a JSON document

use crate::types::{AnalysisSummary, CityReport, Outcome};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Separator used when listing connected cities in a single cell
pub const CITY_SEPARATOR: &str = ";";

/// Report columns, in order
pub const HEADER: [&str; 6] = [
    "city",
    "area",
    "cost",
    "cities_in_starting_area",
    "connected_cities",
    "error",
];

/// Report file name for a run over `area_count` areas with networks of `k` cities
#[must_use]
pub fn report_file_name(area_count: usize, k: usize) -> String {
    format!("{area_count}_areas_and_network_size_{k}.csv")
}

#[derive(Serialize)]
struct ReportRow<'a> {
    city: &'a str,
    area: &'a str,
    cost: Option<u64>,
    cities_in_starting_area: Option<usize>,
    connected_cities: String,
    error: &'a str,
}

impl<'a> From<&'a CityReport> for ReportRow<'a> {
    fn from(report: &'a CityReport) -> Self {
        match &report.outcome {
            Outcome::Connected {
                expansion,
                same_region_count,
            } => Self {
                city: &report.city,
                area: &report.area,
                cost: Some(expansion.total_cost),
                cities_in_starting_area: Some(*same_region_count),
                connected_cities: expansion.connected_cities.join(CITY_SEPARATOR),
                error: "",
            },
            Outcome::Failed { reason } => Self {
                city: &report.city,
                area: &report.area,
                cost: None,
                cities_in_starting_area: None,
                connected_cities: String::new(),
                error: reason,
            },
        }
    }
}

/// Write one CSV row per starting city, with a header
pub fn write_csv<W: Write>(writer: W, reports: &[CityReport]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    // Headers are otherwise only emitted with the first row
    if reports.is_empty() {
        wtr.write_record(HEADER).context("Failed to write header")?;
    }
    for report in reports {
        wtr.serialize(ReportRow::from(report))
            .with_context(|| format!("Failed to write row for {}", report.city))?;
    }
    wtr.flush().context("Failed to flush report")?;
    Ok(())
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    summary: &'a AnalysisSummary,
    results: &'a [CityReport],
}

/// Write the summary and every report as pretty JSON
pub fn write_json<W: Write>(
    writer: W,
    summary: &AnalysisSummary,
    reports: &[CityReport],
) -> Result<()> {
    let document = ReportDocument {
        summary,
        results: reports,
    };
    serde_json::to_writer_pretty(writer, &document).context("Failed to serialize report")
}

/// Write the CSV report into `dir`, returning its path
pub fn save(dir: &Path, area_count: usize, k: usize, reports: &[CityReport]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let path = dir.join(report_file_name(area_count, k));
    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(file, reports).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {} rows to {}", reports.len(), path.display());
    Ok(path)
}
