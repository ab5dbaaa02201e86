// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the bounded greedy expansion
//!
//! These tests verify critical invariants:
//! 1. Determinism - same grid and start produce the same network
//! 2. Shape - exactly `k` cities, start first, connected by the chosen lines
//! 3. Greed - every chosen line was the cheapest on the frontier at the time
//! 4. Strategy agreement - scan and heap frontiers pick identical lines

use gridreach::analysis::{analyze, Analysis};
use gridreach::expand::{expand, expand_with, Strategy as Frontier};
use gridreach::graph::PowerGrid;
use gridreach::prelude::{City, Connection, Expansion, GridError, Outcome};
use proptest::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Test Helpers
// =============================================================================

fn abcd() -> PowerGrid {
    let cities = vec![
        City::new("A", "x"),
        City::new("B", "x"),
        City::new("C", "y"),
        City::new("D", "y"),
    ];
    let connections = vec![
        Connection::new("A", "B", 5),
        Connection::new("B", "C", 3),
        Connection::new("A", "C", 10),
        Connection::new("C", "D", 1),
    ];
    PowerGrid::build(&cities, &connections).unwrap()
}

/// Random grids of up to a dozen cities, possibly disconnected, with
/// duplicate and self-loop lines
fn arb_grid() -> impl Strategy<Value = (Vec<City>, Vec<Connection>)> {
    (1usize..12)
        .prop_flat_map(|n| {
            let lines = prop::collection::vec((0..n, 0..n, 0i64..50), 0..n * 3);
            (Just(n), lines)
        })
        .prop_map(|(n, lines)| {
            let cities = (0..n)
                .map(|i| City::new(format!("c{i}"), if i % 3 == 0 { "red" } else { "gray" }))
                .collect();
            let connections = lines
                .into_iter()
                .map(|(a, b, w)| Connection::new(format!("c{a}"), format!("c{b}"), w))
                .collect();
            (cities, connections)
        })
}

/// Every chosen line joins a new city to one already connected, and is no
/// dearer than any other line leaving the network at that moment
fn assert_greedy_and_connected(grid: &PowerGrid, expansion: &Expansion) {
    let mut inside: HashSet<&str> = HashSet::new();
    inside.insert(expansion.start_city.as_str());

    for (i, step) in expansion.steps.iter().enumerate() {
        assert!(inside.contains(step.from.as_str()), "step {i} starts outside");
        assert!(!inside.contains(step.to.as_str()), "step {i} ends inside");
        assert_eq!(grid.weight(&step.from, &step.to), Some(step.weight));

        for city in &inside {
            for (neighbor, weight) in grid.incident(city).unwrap() {
                if !inside.contains(neighbor) {
                    assert!(step.weight <= weight, "step {i} skipped a cheaper line");
                }
            }
        }

        assert_eq!(expansion.connected_cities[i + 1], step.to);
        inside.insert(step.to.as_str());
    }

    let sum: u64 = expansion.steps.iter().map(|s| s.weight).sum();
    assert_eq!(sum, expansion.total_cost);
}

// =============================================================================
// Worked Scenarios
// =============================================================================

#[test]
fn test_scenario_three_cities() {
    let result = expand(&abcd(), "A", 3).unwrap();

    // D is cheap but unreachable until C joins
    assert_eq!(result.connected_cities, vec!["A", "B", "C"]);
    assert_eq!(result.total_cost, 8);
}

#[test]
fn test_scenario_four_cities() {
    let result = expand(&abcd(), "A", 4).unwrap();

    assert_eq!(result.connected_cities, vec!["A", "B", "C", "D"]);
    assert_eq!(result.total_cost, 9);
}

#[test]
fn test_scenario_five_cities_fails() {
    let err = expand(&abcd(), "A", 5).unwrap_err();

    assert_eq!(
        err,
        GridError::InsufficientReachable {
            start: "A".into(),
            k: 5,
            reachable: 4
        }
    );
}

#[test]
fn test_same_region_count_scenario() {
    let cities = vec![City::new("A", "x"), City::new("B", "x"), City::new("C", "y")];
    let connections = vec![Connection::new("A", "B", 1), Connection::new("B", "C", 1)];
    let grid = PowerGrid::build(&cities, &connections).unwrap();

    let reports = analyze(&cities, &grid, 3).unwrap();

    let counts: Vec<_> = reports
        .iter()
        .map(|r| match &r.outcome {
            Outcome::Connected { same_region_count, .. } => *same_region_count,
            Outcome::Failed { reason } => panic!("{} failed: {reason}", r.city),
        })
        .collect();
    assert_eq!(counts, vec![2, 2, 1]);
}

#[test]
fn test_k_one_for_isolated_city() {
    let cities = vec![City::new("lonely", "x")];
    let grid = PowerGrid::build(&cities, &[]).unwrap();

    let result = expand(&grid, "lonely", 1).unwrap();
    assert_eq!(result.connected_cities, vec!["lonely"]);
    assert_eq!(result.total_cost, 0);
}

#[test]
fn test_every_start_reported_even_when_failing() {
    let cities = vec![
        City::new("A", "x"),
        City::new("B", "x"),
        City::new("C", "x"),
    ];
    let grid = PowerGrid::build(&cities, &[Connection::new("A", "B", 2)]).unwrap();

    let reports = Analysis::new(2).run(&cities, &grid).unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports.iter().filter(|r| r.is_connected()).count(), 2);
    assert!(!reports[2].is_connected());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_expansion_is_deterministic((cities, lines) in arb_grid(), k in 1usize..12) {
        let grid = PowerGrid::build(&cities, &lines).unwrap();
        for city in &cities {
            prop_assert_eq!(expand(&grid, &city.id, k), expand(&grid, &city.id, k));
        }
    }

    #[test]
    fn prop_strategies_agree((cities, lines) in arb_grid(), k in 1usize..12) {
        let grid = PowerGrid::build(&cities, &lines).unwrap();
        for city in &cities {
            prop_assert_eq!(
                expand_with(&grid, &city.id, k, Frontier::Scan),
                expand_with(&grid, &city.id, k, Frontier::Heap)
            );
        }
    }

    #[test]
    fn prop_size_or_insufficient((cities, lines) in arb_grid(), k in 1usize..12) {
        let grid = PowerGrid::build(&cities, &lines).unwrap();
        for city in &cities {
            let component = grid.component_size(&city.id);
            match expand(&grid, &city.id, k) {
                Ok(result) => {
                    prop_assert!(component >= k);
                    prop_assert_eq!(result.len(), k);
                    prop_assert_eq!(&result.connected_cities[0], &city.id);
                    let unique: HashSet<_> = result.connected_cities.iter().collect();
                    prop_assert_eq!(unique.len(), k);
                }
                Err(GridError::InsufficientReachable { reachable, .. }) => {
                    prop_assert!(component < k);
                    prop_assert_eq!(reachable, component);
                }
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }
        }
    }

    #[test]
    fn prop_cost_monotone_in_k((cities, lines) in arb_grid()) {
        let grid = PowerGrid::build(&cities, &lines).unwrap();
        for city in &cities {
            let mut previous = 0;
            for k in 1..=grid.component_size(&city.id) {
                let cost = expand(&grid, &city.id, k).unwrap().total_cost;
                prop_assert!(cost >= previous);
                previous = cost;
            }
        }
    }

    #[test]
    fn prop_greedy_and_connected((cities, lines) in arb_grid()) {
        let grid = PowerGrid::build(&cities, &lines).unwrap();
        for city in &cities {
            let k = grid.component_size(&city.id);
            let result = expand(&grid, &city.id, k).unwrap();
            assert_greedy_and_connected(&grid, &result);
        }
    }

    #[test]
    fn prop_parallel_matches_sequential((cities, lines) in arb_grid(), k in 1usize..6) {
        let grid = PowerGrid::build(&cities, &lines).unwrap();
        let parallel = Analysis::new(k).run(&cities, &grid).unwrap();
        let sequential = Analysis::new(k).parallel(false).run(&cities, &grid).unwrap();
        prop_assert_eq!(parallel, sequential);
    }
}
