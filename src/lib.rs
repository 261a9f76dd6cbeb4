//! # grid_astar
//!
//! Shortest paths between two cells of a grid with blocked cells, using
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with four-directional moves of uniform
//! cost and the [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as
//! heuristic. Connected components are pre-computed when a grid is built to avoid flood-filling
//! behaviour if no path exists.
//!
//! ```
//! use grid_astar::{find_path, Coord, GridBuilder};
//!
//! let mut builder = GridBuilder::new(3, 3);
//! builder.block(Coord::new(1, 1)).unwrap();
//! let grid = builder.build().unwrap();
//! let path = find_path(&grid, Coord::new(0, 0), Coord::new(2, 2)).unwrap();
//! assert_eq!(path.len(), 5);
//! ```
pub mod astar;
pub mod coord;
pub mod error;
pub mod pathing_grid;
pub mod render;
pub mod solver;

pub use astar::{SearchStats, TieBreak};
pub use coord::Coord;
pub use error::{GridError, ParseCoordError, SearchError};
pub use pathing_grid::{GridBuilder, PathingGrid};
pub use render::PathOverlay;
pub use solver::{find_path, is_valid_path, AstarSolver};

/// Cost of a single orthogonal move.
pub const STEP_COST: u32 = 1;
