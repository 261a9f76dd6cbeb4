use crate::astar::{SearchContext, SearchStats, TieBreak};
use crate::coord::Coord;
use crate::error::SearchError;
use crate::pathing_grid::PathingGrid;
use crate::STEP_COST;
use itertools::Itertools;
use log::{debug, info, warn};
use smallvec::SmallVec;

/// A* on a [PathingGrid] with four-directional moves of cost [STEP_COST] and the
/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as heuristic, which is
/// consistent for these moves so the returned paths are shortest paths.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    /// Order of expansion among frontier entries with equal estimated cost. Only affects which
    /// of several shortest paths is returned.
    pub tie_break: TieBreak,
    /// Consult the connected components of the grid before searching, so that a goal on another
    /// component is rejected without flood-filling the grid.
    pub use_components: bool,
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            tie_break: TieBreak::default(),
            use_components: true,
        }
    }

    pub fn heuristic(&self, p: &Coord, goal: &Coord) -> u32 {
        p.manhattan_distance(goal) * STEP_COST
    }

    fn successors(&self, grid: &PathingGrid, node: &Coord) -> SmallVec<[(Coord, u32); 4]> {
        grid.neighbours(node)
            .into_iter()
            .map(|n| (n, STEP_COST))
            .collect()
    }

    /// Computes a shortest path from start to goal, both included. Returns [None] if the goal
    /// cannot be reached.
    ///
    /// An out-of-bounds start or goal yields [None]. Blocked endpoints are not rejected: a
    /// blocked start is still expanded, and `start == goal` yields `[start]` whatever the cell
    /// holds, while a blocked goal is never reached otherwise. Use
    /// [find_path_checked](Self::find_path_checked) to report such input as an error.
    pub fn find_path(&self, grid: &PathingGrid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
        self.find_path_with_stats(grid, start, goal).0
    }

    /// Like [find_path](Self::find_path), also returning counters of the search.
    pub fn find_path_with_stats(
        &self,
        grid: &PathingGrid,
        start: Coord,
        goal: Coord,
    ) -> (Option<Vec<Coord>>, SearchStats) {
        if !grid.in_bounds(start) || !grid.in_bounds(goal) {
            info!("{} or {} lies outside the grid", start, goal);
            return (None, SearchStats::default());
        }
        // The component check only describes free cells, a blocked start is searched anyway.
        let checked_components = self.use_components && grid.can_move_to(start);
        if checked_components && grid.unreachable(&start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            return (None, SearchStats::default());
        }
        let mut ctx = SearchContext::new(self.tie_break);
        let result = ctx.astar(
            &start,
            |node| self.successors(grid, node),
            |point| self.heuristic(point, &goal),
            |point| *point == goal,
        );
        let stats = ctx.stats();
        debug!("Search from {} to {}: {:?}", start, goal, stats);
        match result {
            Some((path, cost)) => {
                info!("Found path from {} to {} with {} steps", start, goal, cost);
                (Some(path), stats)
            }
            None => {
                if checked_components {
                    warn!("Reachable goal could not be pathed to, is reachable graph correct?");
                } else {
                    info!("No path from {} to {}", start, goal);
                }
                (None, stats)
            }
        }
    }

    /// Validates the endpoints before searching: both must lie on the grid and be free.
    pub fn find_path_checked(
        &self,
        grid: &PathingGrid,
        start: Coord,
        goal: Coord,
    ) -> Result<Option<Vec<Coord>>, SearchError> {
        for endpoint in [start, goal] {
            if !grid.in_bounds(endpoint) {
                return Err(SearchError::OutOfBounds(endpoint));
            }
            if grid.is_blocked(endpoint) {
                return Err(SearchError::BlockedEndpoint(endpoint));
            }
        }
        Ok(self.find_path(grid, start, goal))
    }

    /// Total cost of a path, the number of moves times [STEP_COST].
    pub fn path_cost(&self, path: &[Coord]) -> u32 {
        path.len().saturating_sub(1) as u32 * STEP_COST
    }
}

/// Shortest path from start to goal using an [AstarSolver] with default settings.
pub fn find_path(grid: &PathingGrid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    AstarSolver::new().find_path(grid, start, goal)
}

/// Checks that a path runs from start to goal through free cells in orthogonal steps.
pub fn is_valid_path(grid: &PathingGrid, path: &[Coord], start: Coord, goal: Coord) -> bool {
    path.first() == Some(&start)
        && path.last() == Some(&goal)
        && path.iter().all(|p| grid.can_move_to(*p))
        && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathing_grid::GridBuilder;

    fn open_grid(rows: usize, cols: usize) -> PathingGrid {
        GridBuilder::new(rows, cols).build().unwrap()
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = open_grid(1, 1);
        let start = Coord::new(0, 0);
        let path = find_path(&grid, start, start).unwrap();
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn open_grid_corner_to_corner() {
        let grid = open_grid(3, 3);
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 2);
        let path = find_path(&grid, start, goal).unwrap();
        assert_eq!(path.len(), 5);
        assert!(is_valid_path(&grid, &path, start, goal));
    }

    /// Asserts that the optimal 4 step solution is found around a central obstacle.
    #[test]
    fn solve_simple_problem() {
        // S..
        // .#.
        // ..G
        let grid = PathingGrid::from_ascii("...\n.#.\n...").unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 2);
        let path = find_path(&grid, start, goal).unwrap();
        assert_eq!(path.len(), 5);
        assert!(is_valid_path(&grid, &path, start, goal));
        assert_eq!(AstarSolver::new().path_cost(&path), 4);
    }

    #[test]
    fn detour_around_wall() {
        // S..
        // ##.
        // G..
        let grid = PathingGrid::from_ascii("...\n##.\n...").unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 0);
        let path = find_path(&grid, start, goal).unwrap();
        assert_eq!(path.len(), 7);
        assert!(is_valid_path(&grid, &path, start, goal));
    }

    #[test]
    fn partitioned_grid_has_no_path() {
        for use_components in [false, true] {
            let grid = PathingGrid::from_ascii("...\n###\n...").unwrap();
            let solver = AstarSolver {
                use_components,
                ..AstarSolver::new()
            };
            let (path, stats) =
                solver.find_path_with_stats(&grid, Coord::new(0, 0), Coord::new(2, 0));
            assert!(path.is_none());
            if use_components {
                assert_eq!(stats.expanded, 0);
            } else {
                assert_eq!(stats.expanded, 3);
            }
        }
    }

    #[test]
    fn blocked_goal_has_no_path() {
        for use_components in [false, true] {
            let grid = PathingGrid::from_ascii("..\n.#").unwrap();
            let solver = AstarSolver {
                use_components,
                ..AstarSolver::new()
            };
            assert!(solver
                .find_path(&grid, Coord::new(0, 0), Coord::new(1, 1))
                .is_none());
        }
    }

    /// The goal test compares coordinates only, so a blocked cell is its own path.
    #[test]
    fn blocked_start_equal_to_goal() {
        let grid = PathingGrid::from_ascii(".#").unwrap();
        let cell = Coord::new(0, 1);
        assert_eq!(find_path(&grid, cell, cell), Some(vec![cell]));
        assert_eq!(
            AstarSolver::new().find_path_checked(&grid, cell, cell),
            Err(SearchError::BlockedEndpoint(cell))
        );
    }

    /// A blocked start is expanded like any other start cell.
    #[test]
    fn blocked_start_is_searched() {
        let grid = PathingGrid::from_ascii("#..").unwrap();
        for use_components in [false, true] {
            let solver = AstarSolver {
                use_components,
                ..AstarSolver::new()
            };
            let path = solver.find_path(&grid, Coord::new(0, 0), Coord::new(0, 2));
            assert_eq!(path.map(|p| p.len()), Some(3));
        }
    }

    /// Paths never leave the grid, even when the start lies off it.
    #[test]
    fn out_of_bounds_endpoints_have_no_path() {
        let grid = open_grid(3, 3);
        for use_components in [false, true] {
            let solver = AstarSolver {
                use_components,
                ..AstarSolver::new()
            };
            for (start, goal) in [
                (Coord::new(-1, 0), Coord::new(1, 0)),
                (Coord::new(0, 3), Coord::new(0, 2)),
                (Coord::new(0, 0), Coord::new(3, 0)),
                (Coord::new(i32::MAX, 0), Coord::new(0, 0)),
                (Coord::new(0, 0), Coord::new(i32::MIN, i32::MIN)),
            ] {
                let (path, stats) = solver.find_path_with_stats(&grid, start, goal);
                assert!(path.is_none());
                assert_eq!(stats.expanded, 0);
            }
        }
    }

    #[test]
    fn checked_rejects_bad_endpoints() {
        let grid = PathingGrid::from_ascii("..\n#.").unwrap();
        let solver = AstarSolver::new();
        assert_eq!(
            solver.find_path_checked(&grid, Coord::new(0, 0), Coord::new(0, 2)),
            Err(SearchError::OutOfBounds(Coord::new(0, 2)))
        );
        assert_eq!(
            solver.find_path_checked(&grid, Coord::new(-1, 0), Coord::new(0, 1)),
            Err(SearchError::OutOfBounds(Coord::new(-1, 0)))
        );
        assert_eq!(
            solver.find_path_checked(&grid, Coord::new(1, 0), Coord::new(0, 1)),
            Err(SearchError::BlockedEndpoint(Coord::new(1, 0)))
        );
        let path = solver
            .find_path_checked(&grid, Coord::new(0, 0), Coord::new(1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    /// With deeper nodes preferred the search runs straight at the goal on an open grid.
    #[test]
    fn tie_break_limits_expansions() {
        let grid = open_grid(10, 10);
        let start = Coord::new(0, 0);
        let goal = Coord::new(9, 9);
        let (path, stats) = AstarSolver::new().find_path_with_stats(&grid, start, goal);
        assert_eq!(path.map(|p| p.len()), Some(19));
        assert_eq!(stats.expanded, 18);

        let shallow = AstarSolver {
            tie_break: TieBreak::PreferShallower,
            ..AstarSolver::new()
        };
        let (path, shallow_stats) = shallow.find_path_with_stats(&grid, start, goal);
        assert_eq!(path.map(|p| p.len()), Some(19));
        assert!(shallow_stats.expanded > stats.expanded);
    }

    #[test]
    fn deterministic_path() {
        let grid = PathingGrid::from_ascii(
            "
            .....
            .#.#.
            .....
            ",
        )
        .unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 4);
        let first = find_path(&grid, start, goal).unwrap();
        for _ in 0..5 {
            assert_eq!(find_path(&grid, start, goal).unwrap(), first);
        }
        assert_eq!(first.len(), 7);
    }

    #[test]
    fn path_validation() {
        let grid = PathingGrid::from_ascii("..\n#.").unwrap();
        let start = Coord::new(0, 0);
        let goal = Coord::new(1, 1);
        let good = [start, Coord::new(0, 1), goal];
        assert!(is_valid_path(&grid, &good, start, goal));
        assert!(!is_valid_path(&grid, &[start, goal], start, goal));
        assert!(!is_valid_path(
            &grid,
            &[start, Coord::new(1, 0), goal],
            start,
            goal
        ));
        assert!(!is_valid_path(&grid, &[], start, goal));
        assert_eq!(AstarSolver::new().path_cost(&[]), 0);
    }
}
