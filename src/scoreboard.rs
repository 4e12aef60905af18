//! Turn and score bookkeeping seen by the engine.
use tracing::info;

/// Collaborator notified after every resolved match batch.
///
/// `game_ended` is consulted before each full-board match pass; once it
/// returns `true` the engine stops finding matches.
pub trait TurnObserver {
    fn process_turn(&mut self, removed: usize, count_as_move: bool);

    fn game_ended(&self) -> bool;
}

/// Accumulates one point per removed piece and counts player moves.
///
/// The game ends when the optional move limit is used up or the optional
/// point goal is reached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    points: u32,
    moves: u32,
    batches: u32,
    move_limit: Option<u32>,
    point_goal: Option<u32>,
}

impl Scoreboard {
    pub fn new(move_limit: Option<u32>, point_goal: Option<u32>) -> Self {
        Scoreboard {
            move_limit,
            point_goal,
            ..Self::default()
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Number of removal batches reported, cascades included.
    pub fn batches(&self) -> u32 {
        self.batches
    }

    /// Moves left before the limit, or `None` when unlimited.
    pub fn moves_left(&self) -> Option<u32> {
        self.move_limit
            .map(|limit| limit.saturating_sub(self.moves))
    }

    pub fn goal_reached(&self) -> bool {
        self.point_goal.is_some_and(|goal| self.points >= goal)
    }
}

impl TurnObserver for Scoreboard {
    fn process_turn(&mut self, removed: usize, count_as_move: bool) {
        let removed = u32::try_from(removed).unwrap_or(u32::MAX);
        self.points = self.points.saturating_add(removed);
        self.batches += 1;
        if count_as_move {
            self.moves += 1;
        }
        if self.game_ended() {
            info!(points = self.points, moves = self.moves, "game ended");
        }
    }

    fn game_ended(&self) -> bool {
        self.goal_reached() || self.moves_left() == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_and_moves_accumulate() {
        let mut board = Scoreboard::new(None, None);
        board.process_turn(3, true);
        board.process_turn(5, false);
        assert_eq!(board.points(), 8);
        assert_eq!(board.moves(), 1);
        assert_eq!(board.batches(), 2);
        assert!(!board.game_ended());
    }

    #[test]
    fn test_points_saturate_instead_of_wrapping() {
        let mut board = Scoreboard::new(None, None);
        board.process_turn(usize::MAX, true);
        assert_eq!(board.points(), u32::MAX);
        board.process_turn(3, false);
        assert_eq!(board.points(), u32::MAX);
        assert_eq!(board.batches(), 2);
    }

    #[test]
    fn test_move_limit_ends_game() {
        let mut board = Scoreboard::new(Some(2), None);
        board.process_turn(3, true);
        assert_eq!(board.moves_left(), Some(1));
        board.process_turn(3, false);
        assert!(!board.game_ended());
        board.process_turn(4, true);
        assert!(board.game_ended());
    }

    #[test]
    fn test_point_goal_ends_game() {
        let mut board = Scoreboard::new(None, Some(6));
        board.process_turn(3, true);
        assert!(!board.goal_reached());
        board.process_turn(3, false);
        assert!(board.goal_reached());
        assert!(board.game_ended());
    }
}
