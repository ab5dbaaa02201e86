// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
//! Build a grid from arbitrary records and expand from every city

#![no_main]

use arbitrary::Arbitrary;
use gridreach::error::GridError;
use gridreach::expand::{expand_with, Strategy};
use gridreach::graph::PowerGrid;
use gridreach::types::{City, Connection};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    cities: Vec<(u8, u8)>,
    lines: Vec<(u8, u8, i16)>,
    k: u8,
}

fuzz_target!(|input: Input| {
    let cities: Vec<City> = input
        .cities
        .iter()
        .map(|(id, region)| City::new(format!("c{id}"), format!("r{}", region % 4)))
        .collect();
    let lines: Vec<Connection> = input
        .lines
        .iter()
        .map(|(a, b, w)| Connection::new(format!("c{a}"), format!("c{b}"), i64::from(*w)))
        .collect();

    let Ok(grid) = PowerGrid::build(&cities, &lines) else {
        return;
    };

    let k = usize::from(input.k);
    for city in grid.cities() {
        let scan = expand_with(&grid, &city.id, k, Strategy::Scan);
        let heap = expand_with(&grid, &city.id, k, Strategy::Heap);
        assert_eq!(scan, heap);

        match scan {
            Ok(expansion) => assert_eq!(expansion.len(), k),
            Err(GridError::InsufficientReachable { reachable, .. }) => assert!(reachable < k),
            Err(GridError::InvalidParameter(_)) => assert_eq!(k, 0),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
});
