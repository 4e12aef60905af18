//! Turn controller: selection, swapping and cascade resolution.
//!
//! The controller owns the grid and its collaborators and serializes all
//! board mutation behind a single processing lock. A successful swap takes
//! the lock; the controller then parks in [`TurnPhase::Resolving`] or
//! [`TurnPhase::CascadeResolving`] and only resumes through [`TurnController::advance`]
//! once the move sink reports that the board has settled. The lock is
//! released when the swap is reverted or the cascade finds no further match.
use crate::cascade::remove_and_refill;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::grid::{Grid, Layout, PieceId, Position};
use crate::matcher::{removal_set, scan_board};
use crate::motion::{MoveHint, MoveSink};
use crate::scoreboard::{Scoreboard, TurnObserver};
use crate::source::{PieceSource, RandomPieces};
use tracing::{debug, info};

/// Where the controller is in a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the first selection.
    Idle,
    /// One piece is selected.
    Selected(PieceId),
    /// Two pieces were swapped; waiting to check for matches.
    Resolving { first: Position, second: Position },
    /// A batch was removed and refilled; waiting to check for cascades.
    CascadeResolving,
}

/// What a selection did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The lock is held or the piece no longer exists; nothing changed.
    Ignored,
    Selected,
    /// The selected piece was chosen again and is no longer selected.
    Deselected,
    /// The second piece was not next to the first; the selection was dropped.
    NotAdjacent,
    /// The pieces were exchanged and the lock taken.
    Swapped,
}

/// Accounting for the most recent swap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// `true` if the swap produced a match and was kept.
    pub kept: bool,
    /// Removal batches, the triggering match included.
    pub waves: u32,
    pub removed: usize,
}

/// Arbitrates player swaps one at a time and runs the resulting cascades.
pub struct TurnController<S, O, M> {
    grid: Grid,
    source: S,
    observer: O,
    sink: M,
    phase: TurnPhase,
    processing: bool,
    pending: Vec<PieceId>,
    summary: TurnSummary,
    max_generation_attempts: u32,
}

impl<S, O, M> TurnController<S, O, M>
where
    S: PieceSource,
    O: TurnObserver,
    M: MoveSink,
{
    /// Wraps an existing grid. The grid is used as-is; call
    /// [`TurnController::initialize_board`] to generate a fresh one.
    pub fn new(grid: Grid, source: S, observer: O, sink: M) -> Self {
        TurnController {
            grid,
            source,
            observer,
            sink,
            phase: TurnPhase::Idle,
            processing: false,
            pending: Vec::new(),
            summary: TurnSummary::default(),
            max_generation_attempts: EngineConfig::default().max_generation_attempts,
        }
    }

    /// Caps the number of regenerations `initialize_board` may perform.
    pub fn with_generation_attempts(mut self, attempts: u32) -> Self {
        self.max_generation_attempts = attempts.max(1);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut M {
        &mut self.sink
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Returns `true` while the processing lock is held.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn selected(&self) -> Option<PieceId> {
        match self.phase {
            TurnPhase::Selected(id) => Some(id),
            _ => None,
        }
    }

    /// Removal set found by the last full-board pass.
    pub fn pending(&self) -> &[PieceId] {
        &self.pending
    }

    /// Accounting for the current or most recent swap.
    pub fn summary(&self) -> TurnSummary {
        self.summary
    }

    /// Fills every usable cell with a random piece, regenerating the whole
    /// board until it starts without a match. The check ignores the observer,
    /// so a game that is already over still gets a match-free board.
    ///
    /// Returns the number of attempts used.
    ///
    /// # Errors
    /// Returns [`EngineError::GenerationExhausted`] if every attempt contained a match.
    pub fn initialize_board(&mut self) -> Result<u32, EngineError> {
        self.phase = TurnPhase::Idle;
        self.processing = false;
        self.summary = TurnSummary::default();

        for attempt in 1..=self.max_generation_attempts {
            self.grid.clear();
            for x in 0..self.grid.width() {
                for y in 0..self.grid.height() {
                    let pos = Position::new(x, y);
                    if self.grid.is_usable(pos) {
                        let kind = self.source.next_kind();
                        self.grid.spawn(kind, pos);
                    }
                }
            }

            if scan_board(&mut self.grid).is_empty() {
                self.pending.clear();
                info!(attempt, "board initialized");
                return Ok(attempt);
            }
            debug!(attempt, "initial board has matches, regenerating");
        }

        self.pending.clear();
        Err(EngineError::GenerationExhausted {
            attempts: self.max_generation_attempts,
        })
    }

    /// Runs the full-board match pass and stores its removal set.
    ///
    /// Always `false` once the observer reports the game has ended.
    pub fn board_has_match(&mut self) -> bool {
        if self.observer.game_ended() {
            self.pending.clear();
            return false;
        }
        let matches = scan_board(&mut self.grid);
        self.pending = removal_set(&matches);
        !matches.is_empty()
    }

    /// Selects the occupant of `pos`. Empty and unusable cells are ignored.
    ///
    /// # Panics
    /// Panics if `pos` lies outside the board.
    pub fn select_at(&mut self, pos: Position) -> SelectionOutcome {
        if self.processing {
            return SelectionOutcome::Ignored;
        }
        match self.grid.occupant(pos) {
            Some(id) => self.process_selection(id),
            None => SelectionOutcome::Ignored,
        }
    }

    /// Feeds one piece selection into the turn state machine.
    pub fn process_selection(&mut self, piece: PieceId) -> SelectionOutcome {
        if self.processing {
            debug!(?piece, "selection ignored while processing");
            return SelectionOutcome::Ignored;
        }
        if self.grid.get_piece(piece).is_none() {
            return SelectionOutcome::Ignored;
        }

        match self.phase {
            TurnPhase::Selected(current) if current == piece => {
                self.phase = TurnPhase::Idle;
                SelectionOutcome::Deselected
            }
            TurnPhase::Selected(current) => {
                self.phase = TurnPhase::Idle;
                self.swap_pieces(current, piece)
            }
            _ => {
                self.phase = TurnPhase::Selected(piece);
                SelectionOutcome::Selected
            }
        }
    }

    fn swap_pieces(&mut self, current: PieceId, target: PieceId) -> SelectionOutcome {
        let first = self.grid.piece(current).position;
        let second = self.grid.piece(target).position;
        if !first.is_adjacent(second) {
            debug!(%first, %second, "swap rejected, pieces not adjacent");
            return SelectionOutcome::NotAdjacent;
        }

        self.processing = true;
        self.summary = TurnSummary::default();
        self.pending.clear();
        self.exchange(first, second);
        self.phase = TurnPhase::Resolving { first, second };
        SelectionOutcome::Swapped
    }

    /// Swaps the occupants of two cells and hints both moves.
    fn exchange(&mut self, first: Position, second: Position) {
        self.grid.swap(first, second);
        for (to, from) in [(first, second), (second, first)] {
            if let Some(id) = self.grid.occupant(to) {
                self.sink.move_to_target(MoveHint {
                    piece: id,
                    kind: self.grid.piece(id).kind,
                    from: (from.x as isize, from.y as isize),
                    to,
                });
            }
        }
    }

    /// Removes the pending removal set, reports it, and refills the board.
    ///
    /// This is the entry point of the cascade loop: afterwards the controller
    /// holds the lock in [`TurnPhase::CascadeResolving`] until `advance` finds
    /// the board quiet. Returns the number of pieces removed.
    ///
    /// Does nothing while a swap is parked in [`TurnPhase::Resolving`]; that
    /// swap is checked and kept or reverted by `advance`.
    pub fn resolve_matched_board(&mut self, count_as_move: bool) -> usize {
        if matches!(self.phase, TurnPhase::Resolving { .. }) {
            debug!("resolve ignored while a swap is pending");
            return 0;
        }
        self.remove_pending(count_as_move)
    }

    fn remove_pending(&mut self, count_as_move: bool) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let doomed = std::mem::take(&mut self.pending);
        for &id in &doomed {
            self.grid.set_matched(id, false);
        }
        let report = remove_and_refill(&mut self.grid, &doomed, &mut self.source, &mut self.sink);
        self.observer.process_turn(report.removed, count_as_move);

        self.summary.waves += 1;
        self.summary.removed += report.removed;
        self.processing = true;
        self.phase = TurnPhase::CascadeResolving;
        debug!(
            removed = report.removed,
            wave = self.summary.waves,
            count_as_move,
            "resolved matched board"
        );
        report.removed
    }

    /// Resumes a parked turn once the move sink has settled.
    ///
    /// Returns `true` if the controller made progress.
    pub fn advance(&mut self) -> bool {
        if !self.processing || !self.sink.is_settled() {
            return false;
        }

        match self.phase {
            TurnPhase::Resolving { first, second } => {
                if self.board_has_match() {
                    self.summary.kept = true;
                    self.remove_pending(true);
                } else {
                    debug!(%first, %second, "no match, reverting swap");
                    self.exchange(first, second);
                    self.finish();
                }
            }
            TurnPhase::CascadeResolving => {
                if self.board_has_match() {
                    self.remove_pending(false);
                } else {
                    self.finish();
                }
            }
            TurnPhase::Idle | TurnPhase::Selected(_) => {
                self.finish();
            }
        }
        true
    }

    /// Calls [`TurnController::advance`] until the controller is idle or
    /// waiting on the move sink.
    pub fn resolve_pending(&mut self) -> TurnSummary {
        while self.advance() {}
        self.summary
    }

    fn finish(&mut self) {
        self.processing = false;
        self.phase = TurnPhase::Idle;
        info!(
            kept = self.summary.kept,
            waves = self.summary.waves,
            removed = self.summary.removed,
            "turn resolved"
        );
    }
}

impl<M: MoveSink> TurnController<RandomPieces, Scoreboard, M> {
    /// Builds a controller from configuration and generates its starting board.
    pub fn from_config(config: &EngineConfig, layout: Layout, sink: M) -> Result<Self, EngineError> {
        config.validate()?;
        let source = match config.seed {
            Some(seed) => RandomPieces::with_seed(config.kinds, seed)?,
            None => RandomPieces::from_entropy(config.kinds)?,
        };
        let observer = Scoreboard::new(config.move_limit, config.point_goal);
        let mut controller = TurnController::new(Grid::new(&layout), source, observer, sink)
            .with_generation_attempts(config.max_generation_attempts);
        controller.initialize_board()?;
        Ok(controller)
    }
}
