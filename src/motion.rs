//! Move-animation sinks.
//!
//! The engine never animates anything itself. Every time a piece changes cell
//! it emits a [`MoveHint`], and before resuming a parked turn it asks the sink
//! whether the board has visually settled.
use crate::grid::{PieceId, PieceKind, Position};
use std::time::{Duration, Instant};

/// A request to animate a piece from `from` to its new cell `to`.
///
/// `from` is signed because freshly spawned pieces start above the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveHint {
    pub piece: PieceId,
    pub kind: PieceKind,
    pub from: (isize, isize),
    pub to: Position,
}

impl MoveHint {
    /// Number of cells the piece travels.
    pub fn distance(&self) -> usize {
        self.from.0.abs_diff(self.to.x as isize) + self.from.1.abs_diff(self.to.y as isize)
    }
}

/// Receives move hints and reports when in-flight movement is complete.
pub trait MoveSink {
    fn move_to_target(&mut self, hint: MoveHint);

    /// Returns `true` once every hinted move has finished.
    fn is_settled(&self) -> bool {
        true
    }
}

/// Discards hints; the board is always settled.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantMoves;

impl MoveSink for InstantMoves {
    fn move_to_target(&mut self, _hint: MoveHint) {}
}

/// Records every hint in order; the board is always settled.
#[derive(Clone, Debug, Default)]
pub struct MoveLog {
    hints: Vec<MoveHint>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints(&self) -> &[MoveHint] {
        &self.hints
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&mut self) -> Vec<MoveHint> {
        std::mem::take(&mut self.hints)
    }
}

impl MoveSink for MoveLog {
    fn move_to_target(&mut self, hint: MoveHint) {
        self.hints.push(hint);
    }
}

/// Treats every batch of moves as taking a fixed amount of wall-clock time.
///
/// The sink is settled once `delay` has elapsed since the most recent hint.
#[derive(Clone, Debug)]
pub struct TimedMoves {
    delay: Duration,
    last_hint: Option<Instant>,
}

impl TimedMoves {
    pub fn new(delay: Duration) -> Self {
        TimedMoves {
            delay,
            last_hint: None,
        }
    }

    /// Time left until the sink reports settled.
    pub fn remaining(&self) -> Duration {
        self.last_hint
            .map_or(Duration::ZERO, |at| self.delay.saturating_sub(at.elapsed()))
    }
}

impl MoveSink for TimedMoves {
    fn move_to_target(&mut self, _hint: MoveHint) {
        self.last_hint = Some(Instant::now());
    }

    fn is_settled(&self) -> bool {
        self.remaining().is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, Layout};

    fn hint() -> MoveHint {
        let mut grid = Grid::new(&Layout::new(1, 1).unwrap());
        let piece = grid.spawn(PieceKind::Red, Position::new(0, 0));
        MoveHint {
            piece,
            kind: PieceKind::Red,
            from: (0, 3),
            to: Position::new(0, 0),
        }
    }

    #[test]
    fn test_hint_distance_counts_rows_above_board() {
        assert_eq!(hint().distance(), 3);
    }

    #[test]
    fn test_move_log_records_and_drains() {
        let mut log = MoveLog::new();
        log.move_to_target(hint());
        log.move_to_target(hint());
        assert_eq!(log.hints().len(), 2);
        assert!(log.is_settled());
        assert_eq!(log.drain().len(), 2);
        assert!(log.hints().is_empty());
    }

    #[test]
    fn test_timed_moves_settle_after_delay() {
        let mut sink = TimedMoves::new(Duration::from_secs(3600));
        assert!(sink.is_settled());
        sink.move_to_target(hint());
        assert!(!sink.is_settled());

        let mut instant = TimedMoves::new(Duration::ZERO);
        instant.move_to_target(hint());
        assert!(instant.is_settled());
    }
}
