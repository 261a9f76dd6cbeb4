use crate::coord::Coord;
use crate::pathing_grid::PathingGrid;
use core::fmt;
use fxhash::FxHashSet;

/// Text view of a grid with a path drawn over it: `S` marks the start, `G` the goal, `*` the
/// cells in between, `#` blocked and `.` free cells.
pub struct PathOverlay<'a> {
    pub grid: &'a PathingGrid,
    pub path: &'a [Coord],
}

impl<'a> PathOverlay<'a> {
    pub fn new(grid: &'a PathingGrid, path: &'a [Coord]) -> PathOverlay<'a> {
        PathOverlay { grid, path }
    }
}

impl fmt::Display for PathOverlay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (rows, cols) = self.grid.dimensions();
        let start = self.path.first();
        let goal = self.path.last();
        let on_path: FxHashSet<&Coord> = self.path.iter().collect();
        for r in 0..rows as i32 {
            let line = (0..cols as i32)
                .map(|c| {
                    let p = Coord::new(r, c);
                    if start == Some(&p) {
                        'S'
                    } else if goal == Some(&p) {
                        'G'
                    } else if on_path.contains(&p) {
                        '*'
                    } else if self.grid.is_blocked(p) {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
