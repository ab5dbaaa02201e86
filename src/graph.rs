// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph data structures for the power grid

use crate::error::{GridError, GridResult};
use crate::types::{City, Connection, Expansion};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use tracing::debug;

/// A power line seen from one of its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incident {
    /// The other endpoint
    pub neighbor: NodeIndex,
    /// Cost of the line
    pub weight: u64,
}

/// The power grid with petgraph backing for traversal
///
/// Built once per run and read-only afterwards, so a single grid can be
/// shared by reference across worker threads.
#[derive(Debug, Clone)]
pub struct PowerGrid {
    /// The underlying undirected graph; nodes carry their city record
    graph: UnGraph<City, u64>,
    /// Map from city ID to node index
    node_indices: HashMap<String, NodeIndex>,
    /// Incident lines per node, in the order the lines were first seen
    adjacency: Vec<Vec<Incident>>,
}

impl PowerGrid {
    /// Build the grid from city and connection records
    ///
    /// A connection naming an unknown city fails with [`GridError::UnknownNode`];
    /// a negative weight, a repeated city ID, or line weights whose sum does not
    /// fit in a `u64` fail with [`GridError::InvalidParameter`]. When the same pair of cities appears more
    /// than once the last weight wins, while the line keeps the position of its
    /// first appearance. Self loops are dropped.
    pub fn build(cities: &[City], connections: &[Connection]) -> GridResult<Self> {
        let mut graph = UnGraph::with_capacity(cities.len(), connections.len());
        let mut node_indices = HashMap::with_capacity(cities.len());

        for city in cities {
            if node_indices.contains_key(&city.id) {
                return Err(GridError::InvalidParameter(format!(
                    "duplicate city identifier '{}'",
                    city.id
                )));
            }
            let idx = graph.add_node(city.clone());
            node_indices.insert(city.id.clone(), idx);
        }

        for connection in connections {
            let from = resolve(&node_indices, &connection.from, connection)?;
            let to = resolve(&node_indices, &connection.to, connection)?;

            let weight = u64::try_from(connection.weight).map_err(|_| {
                GridError::InvalidParameter(format!(
                    "negative weight {} on {}-{}",
                    connection.weight, connection.from, connection.to
                ))
            })?;

            if from == to {
                debug!("Ignoring self loop on {}", connection.from);
                continue;
            }

            if let Some(edge) = graph.find_edge(from, to) {
                debug!(
                    "Duplicate line {}-{}: weight {} replaces {}",
                    connection.from, connection.to, weight, graph[edge]
                );
                graph[edge] = weight;
            } else {
                graph.add_edge(from, to, weight);
            }
        }

        // Every network cost is a sum over a subset of these weights.
        graph
            .edge_weights()
            .try_fold(0u64, |total, &weight| total.checked_add(weight))
            .ok_or_else(|| {
                GridError::InvalidParameter("sum of line weights overflows u64".into())
            })?;

        // Edge indices grow with insertion, so sorting by them restores the
        // order in which each city's lines were first seen.
        let adjacency = graph
            .node_indices()
            .map(|node| {
                let mut edges: Vec<_> = graph.edges(node).collect();
                edges.sort_by_key(|edge| edge.id());
                edges
                    .into_iter()
                    .map(|edge| Incident {
                        neighbor: if edge.source() == node {
                            edge.target()
                        } else {
                            edge.source()
                        },
                        weight: *edge.weight(),
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            graph,
            node_indices,
            adjacency,
        })
    }

    /// Resolve a city ID to its node index
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Whether the grid contains the city
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// City record at a node index taken from this grid
    pub(crate) fn city_at(&self, idx: NodeIndex) -> &City {
        &self.graph[idx]
    }

    /// Get a city by ID
    #[must_use]
    pub fn city(&self, id: &str) -> Option<&City> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Region of a city
    #[must_use]
    pub fn region_of(&self, id: &str) -> Option<&str> {
        self.city(id).map(|c| c.region.as_str())
    }

    /// All cities, in the order they were added
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.graph.node_weights()
    }

    /// Lines incident to a node, in first-seen order
    #[must_use]
    pub fn incident_at(&self, idx: NodeIndex) -> &[Incident] {
        self.adjacency.get(idx.index()).map_or(&[], Vec::as_slice)
    }

    /// Neighbours and line weights of a city, in first-seen order
    pub fn incident(&self, id: &str) -> GridResult<Vec<(&str, u64)>> {
        let idx = self.index_of(id).ok_or_else(|| GridError::UnknownNode {
            city: id.to_string(),
            context: "incident lookup".into(),
        })?;
        Ok(self
            .incident_at(idx)
            .iter()
            .map(|inc| (self.graph[inc.neighbor].id.as_str(), inc.weight))
            .collect())
    }

    /// Weight of the line between two cities, if any
    #[must_use]
    pub fn weight(&self, a: &str, b: &str) -> Option<u64> {
        let (a, b) = (self.index_of(a)?, self.index_of(b)?);
        self.graph.find_edge(a, b).map(|e| self.graph[e])
    }

    /// Number of cities reachable from a city, itself included
    #[must_use]
    pub fn component_size(&self, id: &str) -> usize {
        let Some(start) = self.index_of(id) else {
            return 0;
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut count = 0;
        while bfs.next(&self.graph).is_some() {
            count += 1;
        }
        count
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the grid is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Export to DOT format for Graphviz, optionally highlighting an expansion
    #[must_use]
    pub fn to_dot(&self, highlight: Option<&Expansion>) -> String {
        let members: HashSet<&str> = highlight
            .map(|e| e.connected_cities.iter().map(String::as_str).collect())
            .unwrap_or_default();
        let chosen: HashSet<(&str, &str)> = highlight
            .map(|e| {
                e.steps
                    .iter()
                    .flat_map(|s| [(s.from.as_str(), s.to.as_str()), (s.to.as_str(), s.from.as_str())])
                    .collect()
            })
            .unwrap_or_default();

        let mut dot = String::from("graph grid {\n");
        dot.push_str("  node [shape=ellipse];\n\n");

        for city in self.graph.node_weights() {
            let style = if members.contains(city.id.as_str()) {
                ", style=filled, fillcolor=lightblue"
            } else {
                ""
            };
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"{}\\n{}\"{}];",
                city.id, city.id, city.region, style
            );
        }

        dot.push('\n');

        for edge in self.graph.edge_references() {
            let (a, b) = (&self.graph[edge.source()].id, &self.graph[edge.target()].id);
            let style = if chosen.contains(&(a.as_str(), b.as_str())) {
                ", penwidth=3"
            } else {
                ""
            };
            let _ = writeln!(
                dot,
                "  \"{}\" -- \"{}\" [label=\"{}\"{}];",
                a,
                b,
                edge.weight(),
                style
            );
        }

        dot.push_str("}\n");
        dot
    }
}

fn resolve(
    node_indices: &HashMap<String, NodeIndex>,
    id: &str,
    connection: &Connection,
) -> GridResult<NodeIndex> {
    node_indices
        .get(id)
        .copied()
        .ok_or_else(|| GridError::UnknownNode {
            city: id.to_string(),
            context: format!("connection {}-{}", connection.from, connection.to),
        })
}
