//! Run detection.
//!
//! A run is a maximal sequence of same-kind, connected, not-yet-matched pieces
//! along one axis. `find_match` classifies the run through a single piece,
//! and `scan_board` performs the full-board pass that builds the removal set.
use crate::grid::{Direction, Grid, PieceId, Position};
use crate::super_match::resolve_super_match;
use tracing::debug;

/// Minimum number of pieces in a run for it to count as a match.
pub const MIN_RUN: usize = 3;

/// Classification of a match result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchDirection {
    None,
    Horizontal,
    Vertical,
    LongHorizontal,
    LongVertical,
    Super,
}

impl MatchDirection {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, MatchDirection::Horizontal | MatchDirection::LongHorizontal)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, MatchDirection::Vertical | MatchDirection::LongVertical)
    }
}

/// The pieces of one match, in insertion order, plus its classification.
///
/// Members are unique within a result but not spatially ordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub pieces: Vec<PieceId>,
    pub direction: MatchDirection,
}

impl MatchResult {
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns `true` if the result is long enough to be removed.
    pub fn is_match(&self) -> bool {
        self.direction != MatchDirection::None && self.pieces.len() >= MIN_RUN
    }
}

/// Walks from `from` in `direction`, pushing every same-kind, unmatched
/// occupant onto `connected` until a mismatch, an unusable or empty cell,
/// or the board edge.
pub fn connected_in_direction(
    grid: &Grid,
    from: PieceId,
    direction: Direction,
    connected: &mut Vec<PieceId>,
) {
    let origin = grid.piece(from);
    let kind = origin.kind;
    let mut pos = origin.position;

    while let Some(next) = grid.neighbor(pos, direction) {
        let cell = grid.cell(next);
        if !cell.usable {
            break;
        }
        let Some(id) = cell.occupant else {
            break;
        };
        let neighbour = grid.piece(id);
        if neighbour.matched || neighbour.kind != kind {
            break;
        }
        connected.push(id);
        pos = next;
    }
}

/// Finds the run through the piece `id`.
///
/// The horizontal axis (right, then left) is tried first; the vertical axis
/// (up, then down) only when the horizontal run is shorter than [`MIN_RUN`].
/// Exactly three pieces classify as short, more as long. When neither axis
/// qualifies the result is `None` with the piece as its sole member.
pub fn find_match(grid: &Grid, id: PieceId) -> MatchResult {
    let mut connected = vec![id];
    connected_in_direction(grid, id, Direction::Right, &mut connected);
    connected_in_direction(grid, id, Direction::Left, &mut connected);
    if let Some(direction) = classify(
        connected.len(),
        MatchDirection::Horizontal,
        MatchDirection::LongHorizontal,
    ) {
        return MatchResult {
            pieces: connected,
            direction,
        };
    }

    connected.clear();
    connected.push(id);
    connected_in_direction(grid, id, Direction::Up, &mut connected);
    connected_in_direction(grid, id, Direction::Down, &mut connected);
    if let Some(direction) = classify(
        connected.len(),
        MatchDirection::Vertical,
        MatchDirection::LongVertical,
    ) {
        return MatchResult {
            pieces: connected,
            direction,
        };
    }

    MatchResult {
        pieces: vec![id],
        direction: MatchDirection::None,
    }
}

fn classify(count: usize, short: MatchDirection, long: MatchDirection) -> Option<MatchDirection> {
    match count {
        MIN_RUN => Some(short),
        n if n > MIN_RUN => Some(long),
        _ => None,
    }
}

/// Performs the full-board match pass.
///
/// Clears every `matched` flag, then visits usable cells column by column,
/// bottom to top. Each unflagged occupant whose run qualifies is passed
/// through [`resolve_super_match`]; the resulting members are flagged so that
/// later candidates and directional scans skip them.
///
/// The pass is order-dependent: a vertical run whose members were all
/// claimed by earlier horizontal matches is not reported separately.
pub fn scan_board(grid: &mut Grid) -> Vec<MatchResult> {
    grid.reset_matched();
    let mut matches = Vec::new();

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let cell = *grid.cell(Position::new(x, y));
            if !cell.usable {
                continue;
            }
            let Some(id) = cell.occupant else {
                continue;
            };
            if grid.piece(id).matched {
                continue;
            }

            let result = find_match(grid, id);
            if result.len() < MIN_RUN {
                continue;
            }
            let result = resolve_super_match(grid, result);
            for &member in &result.pieces {
                grid.set_matched(member, true);
            }
            debug!(
                direction = ?result.direction,
                kind = ?grid.piece(id).kind,
                size = result.len(),
                "match found"
            );
            matches.push(result);
        }
    }

    matches
}

/// Flattens a pass's matches into one removal set, preserving insertion order.
pub fn removal_set(matches: &[MatchResult]) -> Vec<PieceId> {
    matches
        .iter()
        .flat_map(|result| result.pieces.iter().copied())
        .collect()
}
