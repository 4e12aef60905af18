//! Move hints: which swaps would produce a match right now.
use crate::grid::{Direction, Grid, Position};
use crate::matcher::scan_board;

/// An exchange of two adjacent occupied cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swap {
    pub from: Position,
    pub to: Position,
}

/// Returns `true` if exchanging the occupants of `a` and `b` would leave at
/// least one match on the board. The grid itself is not touched.
pub fn would_match(grid: &Grid, a: Position, b: Position) -> bool {
    let mut probe = grid.clone();
    probe.swap(a, b);
    !scan_board(&mut probe).is_empty()
}

/// Lists every swap of two adjacent occupied cells that would produce a match,
/// in column-major order of the first cell.
///
/// Each pair is reported once, with `to` to the right of or above `from`.
pub fn find_swaps(grid: &Grid) -> Vec<Swap> {
    let mut probe = grid.clone();
    let mut swaps = Vec::new();

    for from in grid.positions() {
        if grid.occupant(from).is_none() {
            continue;
        }
        for direction in [Direction::Right, Direction::Up] {
            let Some(to) = grid.neighbor(from, direction) else {
                continue;
            };
            if grid.occupant(to).is_none() {
                continue;
            }
            if grid.kind_at(from) == grid.kind_at(to) {
                continue;
            }

            probe.swap(from, to);
            if !scan_board(&mut probe).is_empty() {
                swaps.push(Swap { from, to });
            }
            probe.swap(from, to);
        }
    }

    swaps
}
