//! Error types. Not finding a path is not an error: searches report it as [None].

use crate::coord::Coord;
use thiserror::Error;

/// Rejected grid input, raised while constructing a [PathingGrid](crate::PathingGrid).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Zero rows or zero columns.
    #[error("grid must have at least one row and one column")]
    Empty,

    /// A row whose length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{0} lies outside the grid")]
    OutOfBounds(Coord),

    #[error("{0} is already blocked")]
    AlreadyBlocked(Coord),

    /// A character other than `#` or `.` in an ASCII map.
    #[error("invalid cell {found:?} at ({row}, {col})")]
    InvalidCell { row: usize, col: usize, found: char },
}

/// Precondition violations caught by
/// [AstarSolver::find_path_checked](crate::solver::AstarSolver::find_path_checked).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("endpoint {0} lies outside the grid")]
    OutOfBounds(Coord),

    #[error("endpoint {0} is blocked")]
    BlockedEndpoint(Coord),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCoordError {
    #[error("expected two integers separated by a space, got {0:?}")]
    WrongArity(String),

    #[error("{0:?} is not an integer")]
    NotAnInteger(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let e = GridError::NotRectangular {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(e.to_string(), "row 2 has 1 cells, expected 3");
        let e = SearchError::BlockedEndpoint(Coord::new(1, 2));
        assert_eq!(e.to_string(), "endpoint (1, 2) is blocked");
        let e = GridError::InvalidCell {
            row: 1,
            col: 0,
            found: 'x',
        };
        assert_eq!(e.to_string(), "invalid cell 'x' at (1, 0)");
        let e = ParseCoordError::WrongArity("3".to_owned());
        assert_eq!(
            e.to_string(),
            "expected two integers separated by a space, got \"3\""
        );
    }
}
