// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Gridreach library - bounded greedy expansion over a regional power grid
//!
//! This crate builds an undirected weighted graph of cities and power lines,
//! then grows a `k`-city network from every starting city by repeatedly taking
//! the cheapest power line that leaves the network built so far.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod commands;
pub mod config;
pub mod error;
pub mod expand;
pub mod graph;
pub mod loader;
pub mod report;

/// Core data types shared by the graph, the expander and the report writer
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    // =========================================================================
    // Input Records
    // =========================================================================

    /// A city node, as read from `cities.csv`
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct City {
        /// Unique city identifier
        #[serde(rename = "city")]
        pub id: String,
        /// Region (area) label
        #[serde(rename = "area")]
        pub region: String,
    }

    impl City {
        /// Create a city in the given region
        pub fn new(id: impl Into<String>, region: impl Into<String>) -> Self {
            Self {
                id: id.into(),
                region: region.into(),
            }
        }
    }

    /// An undirected power line between two cities, as read from `connections.csv`
    ///
    /// The weight is signed so that negative costs in the source data can be
    /// detected and rejected when the grid is built.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Connection {
        /// One endpoint
        pub from: String,
        /// The other endpoint
        pub to: String,
        /// Cost of building the line
        pub weight: i64,
    }

    impl Connection {
        /// Create a connection between two cities
        pub fn new(from: impl Into<String>, to: impl Into<String>, weight: i64) -> Self {
            Self {
                from: from.into(),
                to: to.into(),
                weight,
            }
        }
    }

    // =========================================================================
    // Expansion Results
    // =========================================================================

    /// A power line chosen during an expansion
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Step {
        /// Endpoint that was already in the network
        pub from: String,
        /// Endpoint that joined the network
        pub to: String,
        /// Cost of the line
        pub weight: u64,
    }

    /// The network grown from a single starting city
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Expansion {
        /// Starting city
        pub start_city: String,
        /// Region of the starting city
        pub start_region: String,
        /// Cities in the order they joined, starting city first
        pub connected_cities: Vec<String>,
        /// Sum of the chosen line weights
        pub total_cost: u64,
        /// Lines in the order they were chosen
        pub steps: Vec<Step>,
    }

    impl Expansion {
        /// Number of cities in the network
        #[must_use]
        pub fn len(&self) -> usize {
            self.connected_cities.len()
        }

        /// Whether the network holds no cities
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.connected_cities.is_empty()
        }
    }

    /// Result of analysing one starting city
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "status", rename_all = "lowercase")]
    pub enum Outcome {
        /// A `k`-city network was built
        Connected {
            /// The expansion itself
            expansion: Expansion,
            /// Connected cities sharing the starting city's region
            same_region_count: usize,
        },
        /// Not enough cities were reachable
        Failed {
            /// Human readable reason
            reason: String,
        },
    }

    /// One row of the analysis report
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CityReport {
        /// Starting city
        pub city: String,
        /// Region of the starting city
        pub area: String,
        /// What happened
        #[serde(flatten)]
        pub outcome: Outcome,
    }

    impl CityReport {
        /// Total cost if the expansion succeeded
        #[must_use]
        pub fn cost(&self) -> Option<u64> {
            match &self.outcome {
                Outcome::Connected { expansion, .. } => Some(expansion.total_cost),
                Outcome::Failed { .. } => None,
            }
        }

        /// Whether the expansion succeeded
        #[must_use]
        pub fn is_connected(&self) -> bool {
            matches!(self.outcome, Outcome::Connected { .. })
        }
    }

    // =========================================================================
    // Run Summary
    // =========================================================================

    /// Aggregate figures for one analysis run
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AnalysisSummary {
        /// Regions the cities were drawn from
        pub areas: Vec<String>,
        /// Target network size
        pub k: usize,
        /// Starting cities analysed
        pub analysed: usize,
        /// Starting cities that reached `k` cities
        pub connected: usize,
        /// Starting cities that did not
        pub failed: usize,
        /// Cheapest starting city and its cost
        pub cheapest: Option<(String, u64)>,
        /// When the summary was produced
        pub generated_at: DateTime<Utc>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{GridError, GridResult};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
