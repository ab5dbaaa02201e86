// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Loading city and power line records

use crate::config::Config;
use crate::types::{City, Connection};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Cities and power lines selected for one run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Cities in the selected regions, in file order
    pub cities: Vec<City>,
    /// Lines whose endpoints are both selected, in file order
    pub connections: Vec<Connection>,
}

/// Read `city,area` records from a CSV file
pub fn read_cities(path: &Path) -> Result<Vec<City>> {
    read_records(path)
}

/// Read `from,to,weight` records from a CSV file
pub fn read_connections(path: &Path) -> Result<Vec<Connection>> {
    read_records(path)
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    parse_records(file).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse CSV records with a header row
pub fn parse_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: T = result.with_context(|| format!("Bad record {}", line + 1))?;
        out.push(record);
    }
    Ok(out)
}

/// Keep cities whose region is one of `areas`
#[must_use]
pub fn filter_cities(cities: Vec<City>, areas: &[String]) -> Vec<City> {
    cities
        .into_iter()
        .filter(|c| areas.contains(&c.region))
        .collect()
}

/// Keep connections whose endpoints are both among `cities`
#[must_use]
pub fn filter_connections(connections: Vec<Connection>, cities: &[City]) -> Vec<Connection> {
    let names: HashSet<&str> = cities.iter().map(|c| c.id.as_str()).collect();
    connections
        .into_iter()
        .filter(|c| names.contains(c.from.as_str()) && names.contains(c.to.as_str()))
        .collect()
}

/// Read both record files and keep what belongs to the configured regions
pub fn load(config: &Config) -> Result<Dataset> {
    let all_cities = read_cities(&config.cities)?;
    let all_connections = read_connections(&config.connections)?;
    debug!(
        "Read {} cities and {} lines",
        all_cities.len(),
        all_connections.len()
    );

    let cities = filter_cities(all_cities, &config.areas);
    let connections = filter_connections(all_connections, &cities);
    info!(
        "Selected {} cities and {} lines in {} areas",
        cities.len(),
        connections.len(),
        config.areas.len()
    );

    Ok(Dataset {
        cities,
        connections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: &str = "city,area\nseattle,purple\nportland,purple\nboise,red\nreno,gray\n";
    const LINES: &str = "from,to,weight\nseattle,portland,3\nportland,boise,7\nboise,reno,2\n";

    #[test]
    fn test_parse_cities() {
        let cities: Vec<City> = parse_records(CITIES.as_bytes()).unwrap();

        assert_eq!(cities.len(), 4);
        assert_eq!(cities[0], City::new("seattle", "purple"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let lines: Vec<Connection> =
            parse_records("from, to, weight\n a , b , 4 \n".as_bytes()).unwrap();

        assert_eq!(lines, vec![Connection::new("a", "b", 4)]);
    }

    #[test]
    fn test_non_integer_weight_fails() {
        let result: Result<Vec<Connection>> = parse_records("from,to,weight\na,b,x\n".as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn test_filters() {
        let cities: Vec<City> = parse_records(CITIES.as_bytes()).unwrap();
        let lines: Vec<Connection> = parse_records(LINES.as_bytes()).unwrap();

        let selected = filter_cities(cities, &["purple".into(), "red".into()]);
        let names: Vec<_> = selected.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(names, vec!["seattle", "portland", "boise"]);

        let kept = filter_connections(lines, &selected);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|c| c.from != "reno" && c.to != "reno"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_cities(Path::new("/nonexistent/cities.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cities.csv"));
    }
}
