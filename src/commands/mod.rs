// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod analyse;
pub mod completions;
pub mod config;
pub mod expand;

use crate::config::Config;
use crate::expand::Strategy;
use std::path::PathBuf;

/// Flags that override the data section of the configuration
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DataArgs {
    /// City records (city,area)
    #[arg(long)]
    pub cities: Option<PathBuf>,

    /// Power line records (from,to,weight)
    #[arg(long)]
    pub connections: Option<PathBuf>,

    /// Regions to include, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub areas: Option<Vec<String>>,

    /// Target network size
    #[arg(short)]
    pub k: Option<usize>,

    /// Frontier strategy
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
}

impl DataArgs {
    /// Apply the given flags on top of a loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(cities) = &self.cities {
            config.cities.clone_from(cities);
        }
        if let Some(connections) = &self.connections {
            config.connections.clone_from(connections);
        }
        if let Some(areas) = &self.areas {
            config.areas.clone_from(areas);
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
    }
}

/// How results are shown on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Machine readable JSON instead of text
    pub json: bool,
    /// Colour text output
    pub color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let args = DataArgs {
            areas: Some(vec!["red".into()]),
            k: Some(3),
            strategy: Some(Strategy::Heap),
            ..Default::default()
        };

        args.apply(&mut config);

        assert_eq!(config.areas, vec!["red"]);
        assert_eq!(config.k, 3);
        assert_eq!(config.strategy, Strategy::Heap);
        assert_eq!(config.cities, PathBuf::from("data/cities.csv"));
    }
}
