use crate::coord::Coord;
use crate::error::GridError;
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Immutable occupancy grid searched by the solver. The raw [bool] values live in a [BoolGrid]
/// indexed as `(x, y) = (col, row)` where [true] means blocked. Connected components of free
/// cells (four-connected) are maintained in a [UnionFind] so unreachable goals can be rejected
/// without flood-filling the grid.
///
/// Build one with [GridBuilder], [PathingGrid::from_rows] or [PathingGrid::from_ascii].
#[derive(Clone, Debug)]
pub struct PathingGrid {
    grid: BoolGrid,
    rows: usize,
    cols: usize,
    components: UnionFind<usize>,
}

impl PathingGrid {
    fn from_bool_grid(grid: BoolGrid, rows: usize, cols: usize) -> PathingGrid {
        let mut pathing_grid = PathingGrid {
            grid,
            rows,
            cols,
            components: UnionFind::new(rows * cols),
        };
        pathing_grid.generate_components();
        pathing_grid
    }

    /// Builds a grid from rows of blocked flags. All rows must have the same, non-zero length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<PathingGrid, GridError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut builder = GridBuilder::new(rows.len(), cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::NotRectangular {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &blocked) in row.iter().enumerate() {
                if blocked {
                    builder.block(Coord::new(r as i32, c as i32))?;
                }
            }
        }
        builder.build()
    }

    /// Parses a map with one line per row, `#` for blocked and `.` for free cells. Blank lines
    /// and surrounding whitespace are ignored.
    pub fn from_ascii(map: &str) -> Result<PathingGrid, GridError> {
        let rows = map
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(r, line)| {
                line.chars()
                    .enumerate()
                    .map(|(c, ch)| match ch {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        found => Err(GridError::InvalidCell { row: r, col: c, found }),
                    })
                    .collect::<Result<Vec<bool>, GridError>>()
            })
            .collect::<Result<Vec<_>, GridError>>()?;
        PathingGrid::from_rows(&rows)
    }

    /// Returns `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
    }

    /// Out-of-bounds cells count as blocked.
    pub fn is_blocked(&self, coord: Coord) -> bool {
        !self.in_bounds(coord) || self.grid.get(coord.col as usize, coord.row as usize)
    }

    pub fn can_move_to(&self, coord: Coord) -> bool {
        !self.is_blocked(coord)
    }

    /// The admissible orthogonal neighbours of a cell: in bounds and not blocked, in the order
    /// up, down, left, right.
    pub fn neighbours(&self, coord: &Coord) -> SmallVec<[Coord; 4]> {
        coord
            .neumann_neighborhood()
            .into_iter()
            .filter(|n| self.can_move_to(*n))
            .collect()
    }

    /// Number of free cells.
    pub fn free_cells(&self) -> usize {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .filter(|&(r, c)| !self.grid.get(c, r))
            .count()
    }

    fn get_ix(&self, coord: &Coord) -> usize {
        coord.row as usize * self.cols + coord.col as usize
    }

    /// Retrieves the component id a given free cell belongs to.
    pub fn get_component(&self, coord: &Coord) -> Option<usize> {
        self.can_move_to(*coord)
            .then(|| self.components.find(self.get_ix(coord)))
    }

    /// Checks if start and goal are free cells on the same connected component. A cell is
    /// always reachable from itself as long as it is in bounds.
    pub fn reachable(&self, start: &Coord, goal: &Coord) -> bool {
        if !self.in_bounds(*start) || !self.in_bounds(*goal) {
            return false;
        }
        if start == goal {
            return true;
        }
        self.can_move_to(*start)
            && self.can_move_to(*goal)
            && self.components.equiv(self.get_ix(start), self.get_ix(goal))
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Coord, goal: &Coord) -> bool {
        !self.reachable(start, goal)
    }

    /// Generates a new [UnionFind] structure and links up free grid neighbours to the same
    /// components. Looking right and down suffices since the relation is symmetric.
    fn generate_components(&mut self) {
        info!(
            "Generating connected components for {}x{} grid",
            self.rows, self.cols
        );
        self.components = UnionFind::new(self.rows * self.cols);
        for r in 0..self.rows as i32 {
            for c in 0..self.cols as i32 {
                let coord = Coord::new(r, c);
                if self.is_blocked(coord) {
                    continue;
                }
                let ix = self.get_ix(&coord);
                for n in [coord.offset(1, 0), coord.offset(0, 1)] {
                    if self.can_move_to(n) {
                        let n_ix = self.get_ix(&n);
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for r in 0..self.rows {
            let line = (0..self.cols)
                .map(|c| if self.grid.get(c, r) { '#' } else { '.' })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Mutable construction step for a [PathingGrid]. Obstacles are placed here; the grid handed to
/// the solver never changes afterwards.
#[derive(Clone, Debug)]
pub struct GridBuilder {
    grid: BoolGrid,
    rows: usize,
    cols: usize,
}

impl GridBuilder {
    /// Starts from a grid of the given size with every cell free.
    pub fn new(rows: usize, cols: usize) -> GridBuilder {
        GridBuilder {
            grid: BoolGrid::new(cols, rows, false),
            rows,
            cols,
        }
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), GridError> {
        if coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
        {
            Ok(())
        } else {
            Err(GridError::OutOfBounds(coord))
        }
    }

    pub fn is_blocked(&self, coord: Coord) -> Result<bool, GridError> {
        self.check_bounds(coord)?;
        Ok(self.grid.get(coord.col as usize, coord.row as usize))
    }

    /// Places an obstacle. Blocking a cell twice is reported as [GridError::AlreadyBlocked].
    pub fn block(&mut self, coord: Coord) -> Result<&mut Self, GridError> {
        if self.is_blocked(coord)? {
            return Err(GridError::AlreadyBlocked(coord));
        }
        self.grid.set(coord.col as usize, coord.row as usize, true);
        Ok(self)
    }

    pub fn unblock(&mut self, coord: Coord) -> Result<&mut Self, GridError> {
        self.check_bounds(coord)?;
        self.grid.set(coord.col as usize, coord.row as usize, false);
        Ok(self)
    }

    /// Blocks every cell of the `rows x cols` rectangle whose top left corner is `top_left`.
    /// Cells that are already blocked are left as they are.
    pub fn block_rect(
        &mut self,
        top_left: Coord,
        rows: usize,
        cols: usize,
    ) -> Result<&mut Self, GridError> {
        if rows == 0 || cols == 0 {
            return Ok(self);
        }
        self.check_bounds(top_left)?;
        // Far edge of the rectangle, saturated at i32::MAX so oversized rectangles fail the
        // bounds check instead of wrapping.
        let far_edge = |start: i32, len: usize| {
            (start as usize)
                .checked_add(len - 1)
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(i32::MAX)
        };
        let bottom_right = Coord::new(
            far_edge(top_left.row, rows),
            far_edge(top_left.col, cols),
        );
        self.check_bounds(bottom_right)?;
        for r in top_left.row as usize..=bottom_right.row as usize {
            for c in top_left.col as usize..=bottom_right.col as usize {
                self.grid.set(c, r, true);
            }
        }
        Ok(self)
    }

    /// Freezes the grid and computes its connected components.
    pub fn build(&self) -> Result<PathingGrid, GridError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::Empty);
        }
        Ok(PathingGrid::from_bool_grid(
            self.grid.clone(),
            self.rows,
            self.cols,
        ))
    }
}
