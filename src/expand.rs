// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bounded greedy expansion from a starting city
//!
//! Starting from a single city, the network grows by repeatedly taking the
//! cheapest power line with exactly one endpoint inside it, until it holds `k`
//! cities. Ties go to the line met first when walking the connected cities in
//! the order they joined, and each city's lines in the order they were first
//! seen. Both frontier strategies honour that order, so they return identical
//! networks.

use crate::error::{GridError, GridResult};
use crate::graph::PowerGrid;
use crate::types::{Expansion, Step};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, trace};

/// How the cheapest frontier line is found on each step
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rescan every line of every connected city
    #[default]
    Scan,
    /// Keep frontier lines in a priority queue
    Heap,
}

impl Strategy {
    /// Lowercase name, as accepted on the command line
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Heap => "heap",
        }
    }
}

/// A frontier line that may join the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    from: NodeIndex,
    to: NodeIndex,
    weight: u64,
}

/// Working state of a single expansion, never shared between starts
struct ExpansionState<'g> {
    grid: &'g PowerGrid,
    connected: Vec<NodeIndex>,
    member: Vec<bool>,
    chosen: Vec<Candidate>,
    total_cost: u64,
}

impl<'g> ExpansionState<'g> {
    fn new(grid: &'g PowerGrid, start: NodeIndex) -> Self {
        let mut member = vec![false; grid.node_count()];
        member[start.index()] = true;
        Self {
            grid,
            connected: vec![start],
            member,
            chosen: Vec::new(),
            total_cost: 0,
        }
    }

    fn len(&self) -> usize {
        self.connected.len()
    }

    fn is_member(&self, idx: NodeIndex) -> bool {
        self.member[idx.index()]
    }

    /// The grid bounds the sum of all its weights, so this cannot overflow
    fn join(&mut self, candidate: Candidate) {
        self.total_cost += candidate.weight;
        self.member[candidate.to.index()] = true;
        self.connected.push(candidate.to);
        self.chosen.push(candidate);
    }

    fn into_expansion(self) -> Expansion {
        let grid = self.grid;
        let id = |idx: NodeIndex| grid.city_at(idx).id.clone();
        let start = grid.city_at(self.connected[0]);

        Expansion {
            start_city: start.id.clone(),
            start_region: start.region.clone(),
            connected_cities: self.connected.iter().map(|&idx| id(idx)).collect(),
            total_cost: self.total_cost,
            steps: self
                .chosen
                .iter()
                .map(|c| Step {
                    from: id(c.from),
                    to: id(c.to),
                    weight: c.weight,
                })
                .collect(),
        }
    }
}

/// Source of the cheapest frontier line
trait FrontierSearch {
    /// Called once a city has joined at `position` in the connected order
    fn admit(&mut self, state: &ExpansionState<'_>, position: usize);

    /// Cheapest line leaving the network, if any
    fn cheapest(&mut self, state: &ExpansionState<'_>) -> Option<Candidate>;
}

/// Rescans all lines of the connected cities on every step
struct ScanFrontier;

impl FrontierSearch for ScanFrontier {
    fn admit(&mut self, _state: &ExpansionState<'_>, _position: usize) {}

    fn cheapest(&mut self, state: &ExpansionState<'_>) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for &city in &state.connected {
            for line in state.grid.incident_at(city) {
                // Both ends inside: no longer part of the frontier
                if state.is_member(line.neighbor) {
                    continue;
                }
                if best.map_or(true, |b| line.weight < b.weight) {
                    best = Some(Candidate {
                        from: city,
                        to: line.neighbor,
                        weight: line.weight,
                    });
                }
            }
        }

        best
    }
}

/// Min-heap keyed by (weight, position of the owning city, rank of the line)
///
/// Entries whose far end has joined since they were pushed are discarded when
/// popped.
#[derive(Default)]
struct HeapFrontier {
    heap: BinaryHeap<Reverse<(u64, usize, usize, NodeIndex, NodeIndex)>>,
}

impl FrontierSearch for HeapFrontier {
    fn admit(&mut self, state: &ExpansionState<'_>, position: usize) {
        let city = state.connected[position];
        for (rank, line) in state.grid.incident_at(city).iter().enumerate() {
            if !state.is_member(line.neighbor) {
                self.heap
                    .push(Reverse((line.weight, position, rank, city, line.neighbor)));
            }
        }
    }

    fn cheapest(&mut self, state: &ExpansionState<'_>) -> Option<Candidate> {
        while let Some(Reverse((weight, _, _, from, to))) = self.heap.pop() {
            if state.is_member(to) {
                trace!("Discarding stale frontier entry");
                continue;
            }
            return Some(Candidate { from, to, weight });
        }
        None
    }
}

/// Grow a `k`-city network from `start` using the default scan strategy
pub fn expand(grid: &PowerGrid, start: &str, k: usize) -> GridResult<Expansion> {
    expand_with(grid, start, k, Strategy::default())
}

/// Grow a `k`-city network from `start`
///
/// Fails with [`GridError::InvalidParameter`] when `k` is zero,
/// [`GridError::UnknownNode`] when `start` is not in the grid, and
/// [`GridError::InsufficientReachable`] when the frontier runs dry before the
/// network reaches `k` cities.
pub fn expand_with(
    grid: &PowerGrid,
    start: &str,
    k: usize,
    strategy: Strategy,
) -> GridResult<Expansion> {
    if k == 0 {
        return Err(GridError::InvalidParameter(
            "network size k must be at least 1".into(),
        ));
    }

    let start_idx = grid.index_of(start).ok_or_else(|| GridError::UnknownNode {
        city: start.to_string(),
        context: "expansion start".into(),
    })?;

    let state = ExpansionState::new(grid, start_idx);
    let state = match strategy {
        Strategy::Scan => grow(state, &mut ScanFrontier, k)?,
        Strategy::Heap => grow(state, &mut HeapFrontier::default(), k)?,
    };

    Ok(state.into_expansion())
}

fn grow<'g, F: FrontierSearch>(
    mut state: ExpansionState<'g>,
    frontier: &mut F,
    k: usize,
) -> GridResult<ExpansionState<'g>> {
    frontier.admit(&state, 0);

    while state.len() < k {
        let Some(candidate) = frontier.cheapest(&state) else {
            return Err(GridError::InsufficientReachable {
                start: state.grid.city_at(state.connected[0]).id.clone(),
                k,
                reachable: state.len(),
            });
        };

        debug!(
            "Joining {} via {} (weight {})",
            state.grid.city_at(candidate.to).id,
            state.grid.city_at(candidate.from).id,
            candidate.weight
        );

        state.join(candidate);
        frontier.admit(&state, state.len() - 1);
    }

    Ok(state)
}
