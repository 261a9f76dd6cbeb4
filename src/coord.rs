use core::fmt;
use std::str::FromStr;

use crate::error::ParseCoordError;

/// A cell on the grid, addressed by row and column. Rows grow downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

/// Offsets of the four orthogonal moves: up, down, left, right.
pub const NEUMANN_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

impl Coord {
    pub const fn new(row: i32, col: i32) -> Coord {
        Coord { row, col }
    }

    /// Saturates at the ends of the [i32] range, which lie outside any grid.
    pub fn offset(&self, d_row: i32, d_col: i32) -> Coord {
        Coord::new(
            self.row.saturating_add(d_row),
            self.col.saturating_add(d_col),
        )
    }

    /// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), the number of
    /// orthogonal steps between two cells on an empty grid.
    pub fn manhattan_distance(&self, other: &Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if the two cells share an edge.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan_distance(other) == 1
    }

    pub fn neumann_neighborhood(&self) -> [Coord; 4] {
        NEUMANN_OFFSETS.map(|(dr, dc)| self.offset(dr, dc))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Coord {
        Coord::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    /// Parses two whitespace separated integers, e.g. `"3 4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseCoordError::WrongArity(s.trim().to_owned()));
        };
        let parse = |v: &str| {
            v.parse::<i32>()
                .map_err(|_| ParseCoordError::NotAnInteger(v.to_owned()))
        };
        Ok(Coord::new(parse(row)?, parse(col)?))
    }
}
