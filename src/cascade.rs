//! Removal, gravity and refill.
//!
//! After a match batch is removed, every empty usable cell is filled column
//! by column, bottom to top: first by pulling down the nearest piece above it,
//! otherwise by spawning a new piece that enters from above the board.
use crate::grid::{Grid, PieceId, Position};
use crate::motion::{MoveHint, MoveSink};
use crate::source::PieceSource;
use tracing::{debug, trace};

/// Counts from one `remove_and_refill` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefillReport {
    pub removed: usize,
    pub fallen: usize,
    pub spawned: usize,
}

/// How a single empty cell was filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefillOutcome {
    /// An existing piece dropped down from `from`.
    Fell { from: Position },
    /// A new piece was created; it enters from `origin_row` above the board.
    Spawned { origin_row: usize },
}

/// Destroys `pieces` and refills every emptied cell.
///
/// Handles already destroyed (or listed twice) are skipped.
pub fn remove_and_refill<S, M>(
    grid: &mut Grid,
    pieces: &[PieceId],
    source: &mut S,
    sink: &mut M,
) -> RefillReport
where
    S: PieceSource + ?Sized,
    M: MoveSink + ?Sized,
{
    let mut removed = 0;
    for &id in pieces {
        if grid.get_piece(id).is_some() {
            grid.destroy(id);
            removed += 1;
        }
    }

    let mut report = refill(grid, source, sink);
    report.removed = removed;
    report
}

/// Fills every empty usable cell on the board, leaving no gaps under any piece.
pub fn refill<S, M>(grid: &mut Grid, source: &mut S, sink: &mut M) -> RefillReport
where
    S: PieceSource + ?Sized,
    M: MoveSink + ?Sized,
{
    let mut report = RefillReport::default();

    for x in 0..grid.width() {
        let mut queued = 0;
        for y in 0..grid.height() {
            let pos = Position::new(x, y);
            let cell = grid.cell(pos);
            if !cell.usable || cell.occupant.is_some() {
                continue;
            }
            match refill_column_cell(grid, pos, queued, source, sink) {
                RefillOutcome::Fell { .. } => report.fallen += 1,
                RefillOutcome::Spawned { .. } => {
                    report.spawned += 1;
                    queued += 1;
                }
            }
        }
    }

    if report.fallen + report.spawned > 0 {
        debug!(
            fallen = report.fallen,
            spawned = report.spawned,
            "refilled board"
        );
    }
    report
}

/// Fills the empty usable cell at `pos`.
///
/// Walks up the column for the nearest occupant, passing over empty and
/// unusable cells. If one is found it moves down into `pos`; otherwise a new
/// piece is spawned at `pos` with an origin `queued` rows above the top edge,
/// where `queued` is the number of pieces already spawned into this column
/// during the current refill.
pub fn refill_column_cell<S, M>(
    grid: &mut Grid,
    pos: Position,
    queued: usize,
    source: &mut S,
    sink: &mut M,
) -> RefillOutcome
where
    S: PieceSource + ?Sized,
    M: MoveSink + ?Sized,
{
    let above = (pos.y + 1..grid.height())
        .map(|y| Position::new(pos.x, y))
        .find(|&p| grid.occupant(p).is_some());

    if let Some(from) = above {
        if let Some(id) = grid.move_occupant(from, pos) {
            trace!(%from, to = %pos, "piece fell");
            sink.move_to_target(MoveHint {
                piece: id,
                kind: grid.piece(id).kind,
                from: (from.x as isize, from.y as isize),
                to: pos,
            });
        }
        return RefillOutcome::Fell { from };
    }

    let kind = source.next_kind();
    let id = grid.spawn(kind, pos);
    let origin_row = grid.height() + queued;
    debug!(?kind, to = %pos, origin_row, "piece spawned");
    sink.move_to_target(MoveHint {
        piece: id,
        kind,
        from: (pos.x as isize, origin_row as isize),
        to: pos,
    });
    RefillOutcome::Spawned { origin_row }
}
