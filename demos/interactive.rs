//! Reads obstacles and endpoints from stdin, then prints the grid with the shortest path.
//!
//! Usage:
//!   cargo run --example interactive [rows cols]
//!
//! Input: one `row col` line per obstacle, then `end`, then the start and the goal as `row col`.
//! Set `RUST_LOG=debug` to see search statistics.
use grid_astar::{AstarSolver, Coord, GridBuilder, PathOverlay};
use log::warn;
use std::io::{self, BufRead, Write};

fn prompt(msg: &str) -> io::Result<()> {
    print!("{msg}");
    io::stdout().flush()
}

/// Reads lines until one parses as a coordinate. Returns [None] at end of input.
fn read_coord(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    msg: &str,
) -> io::Result<Option<Coord>> {
    loop {
        prompt(msg)?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(None);
        };
        match line.parse::<Coord>() {
            Ok(coord) => return Ok(Some(coord)),
            Err(e) => println!("{e}, try again."),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<usize> = std::env::args()
        .skip(1)
        .map(|a| a.parse())
        .collect::<Result<_, _>>()?;
    let (rows, cols) = match args.as_slice() {
        [rows, cols] => (*rows, *cols),
        _ => (10, 10),
    };

    let mut builder = GridBuilder::new(rows, cols);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Enter obstacles as `row col`, or `end` to finish:");
    loop {
        prompt("> ")?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("end") {
            break;
        }
        let placed = line
            .parse::<Coord>()
            .map_err(|e| e.to_string())
            .and_then(|coord| builder.block(coord).map(|_| ()).map_err(|e| e.to_string()));
        if let Err(e) = placed {
            warn!("Rejected obstacle {:?}", line);
            println!("{e}, try again.");
        }
    }
    let grid = builder.build()?;

    let Some(start) = read_coord(&mut lines, "Start (row col): ")? else {
        return Ok(());
    };
    let Some(goal) = read_coord(&mut lines, "Goal (row col): ")? else {
        return Ok(());
    };

    match AstarSolver::new().find_path_checked(&grid, start, goal)? {
        Some(path) => {
            println!("Path found with {} steps:", path.len() - 1);
            print!("{}", PathOverlay::new(&grid, &path));
        }
        None => println!("No path from {start} to {goal}."),
    }
    Ok(())
}
