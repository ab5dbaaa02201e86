// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Per-city analysis over a shared grid

use crate::error::{GridError, GridResult};
use crate::expand::{expand_with, Strategy};
use crate::graph::PowerGrid;
use crate::types::{AnalysisSummary, City, CityReport, Expansion, Outcome};
use chrono::Utc;
use rayon::prelude::*;
use tracing::{info, warn};

/// Analysis run settings
#[derive(Debug, Clone, Copy)]
pub struct Analysis {
    k: usize,
    strategy: Strategy,
    parallel: bool,
}

impl Analysis {
    /// New analysis for networks of `k` cities
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            strategy: Strategy::default(),
            parallel: true,
        }
    }

    /// Frontier strategy used by every expansion
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fan expansions out over the rayon pool
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Expand from every city and collect one report per city, in input order
    ///
    /// Running out of reachable cities only marks that city as failed. Any
    /// other error aborts the run.
    pub fn run(&self, cities: &[City], grid: &PowerGrid) -> GridResult<Vec<CityReport>> {
        if self.k == 0 {
            return Err(GridError::InvalidParameter(
                "network size k must be at least 1".into(),
            ));
        }

        info!(
            "Analysing {} starting cities (k={}, strategy={}, parallel={})",
            cities.len(),
            self.k,
            self.strategy.as_str(),
            self.parallel
        );

        let reports: Vec<GridResult<CityReport>> = if self.parallel {
            cities.par_iter().map(|city| self.analyse_city(city, grid)).collect()
        } else {
            cities.iter().map(|city| self.analyse_city(city, grid)).collect()
        };

        reports.into_iter().collect()
    }

    fn analyse_city(&self, city: &City, grid: &PowerGrid) -> GridResult<CityReport> {
        let outcome = match expand_with(grid, &city.id, self.k, self.strategy) {
            Ok(expansion) => Outcome::Connected {
                same_region_count: same_region_count(grid, &expansion),
                expansion,
            },
            Err(err) if err.is_recoverable() => {
                warn!("Skipping {}: {}", city.id, err);
                Outcome::Failed {
                    reason: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };

        Ok(CityReport {
            city: city.id.clone(),
            area: city.region.clone(),
            outcome,
        })
    }
}

/// Expand from every city with default settings
pub fn analyze(cities: &[City], grid: &PowerGrid, k: usize) -> GridResult<Vec<CityReport>> {
    Analysis::new(k).run(cities, grid)
}

/// Connected cities whose own region matches the starting city's region
#[must_use]
pub fn same_region_count(grid: &PowerGrid, expansion: &Expansion) -> usize {
    expansion
        .connected_cities
        .iter()
        .filter(|id| grid.region_of(id) == Some(expansion.start_region.as_str()))
        .count()
}

/// Summarise a finished run
#[must_use]
pub fn summarize(areas: &[String], k: usize, reports: &[CityReport]) -> AnalysisSummary {
    let connected = reports.iter().filter(|r| r.is_connected()).count();
    // First cheapest wins ties, matching report order
    let cheapest = reports
        .iter()
        .filter_map(|r| r.cost().map(|cost| (r.city.clone(), cost)))
        .fold(None::<(String, u64)>, |best, (city, cost)| match best {
            Some((_, best_cost)) if best_cost <= cost => best,
            _ => Some((city, cost)),
        });

    AnalysisSummary {
        areas: areas.to_vec(),
        k,
        analysed: reports.len(),
        connected,
        failed: reports.len() - connected,
        cheapest,
        generated_at: Utc::now(),
    }
}
