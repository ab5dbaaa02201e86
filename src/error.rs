// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error taxonomy for grid construction and expansion

use thiserror::Error;

/// Result alias for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised by the graph and the expander
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A city identifier that is not a node of the grid
    #[error("Unknown city '{city}' ({context})")]
    UnknownNode {
        /// The identifier that could not be resolved
        city: String,
        /// Where it was referenced
        context: String,
    },

    /// The starting city's component is smaller than the target size
    #[error("Only {reachable} of {k} cities reachable from '{start}'")]
    InsufficientReachable {
        /// Starting city
        start: String,
        /// Target network size
        k: usize,
        /// Cities connected when the frontier ran out
        reachable: usize,
    },

    /// A bad parameter or a data contract violation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl GridError {
    /// Whether the error only affects a single starting city
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientReachable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_reachability_is_recoverable() {
        let insufficient = GridError::InsufficientReachable {
            start: "seattle".into(),
            k: 5,
            reachable: 2,
        };
        assert!(insufficient.is_recoverable());
        assert!(!GridError::InvalidParameter("k must be at least 1".into()).is_recoverable());
        assert!(!GridError::UnknownNode {
            city: "x".into(),
            context: "test".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_messages_name_the_city() {
        let err = GridError::InsufficientReachable {
            start: "seattle".into(),
            k: 5,
            reachable: 2,
        };
        assert_eq!(err.to_string(), "Only 2 of 5 cities reachable from 'seattle'");
    }
}
