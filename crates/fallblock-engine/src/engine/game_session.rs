use rand::Rng as _;
use tracing::{debug, info};

use crate::{
    ActionError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::{
    action::Action,
    game_stats::GameStats,
    piece_state::{LockOutcome, PiecePhase, PieceStateMachine},
    randomizer::{PieceSeed, Randomizer},
    snapshot::Snapshot,
};

/// What an accepted [`Action`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ActionOutcome {
    Moved,
    /// Rotated using the kick at this index (0 is the unkicked rotation).
    Rotated { kick: usize },
    Held,
    Locked(LockOutcome),
}

/// A single game: the board, the piece state machine and the counters.
///
/// The session is the only owner of the [`Board`]. It lends the board to the
/// piece state machine for each operation.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    pieces: PieceStateMachine,
    stats: GameStats,
    seed: PieceSeed,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a game on an empty board with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_board(Board::EMPTY, seed)
    }

    /// Starts a game on a prepared board.
    ///
    /// Full rows in `board` are cleared first, so every later lock clears at
    /// most the four rows the piece can complete. If the first piece cannot
    /// spawn, the session starts topped out.
    #[must_use]
    pub fn with_board(mut board: Board, seed: PieceSeed) -> Self {
        let cleared = board.clear_full_rows();
        if cleared > 0 {
            debug!(cleared, "cleared full rows of the prepared board");
        }
        let pieces = PieceStateMachine::new(Randomizer::with_seed(seed), &board);
        Self {
            board,
            pieces,
            stats: GameStats::new(),
            seed,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.pieces.active_piece()
    }

    #[must_use]
    pub fn held_kind(&self) -> Option<PieceKind> {
        self.pieces.held_kind()
    }

    #[must_use]
    pub fn phase(&self) -> PiecePhase {
        self.pieces.phase()
    }

    #[must_use]
    pub fn is_topped_out(&self) -> bool {
        self.pieces.phase().is_topped_out()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Kinds left in the current bag, next one first.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.randomizer().upcoming()
    }

    #[must_use]
    pub fn hard_drop_distance(&self) -> usize {
        self.pieces.hard_drop_distance(&self.board)
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.active_piece().dropped(&self.board)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Applies one action.
    ///
    /// A rejected action returns an error and changes nothing. `SoftDrop`
    /// locks the piece instead of failing when it cannot move down.
    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome, ActionError> {
        let outcome = match action {
            Action::MoveLeft => self.try_move(-1, 0)?,
            Action::MoveRight => self.try_move(1, 0)?,
            Action::SoftDrop => match self.try_move(0, 1) {
                Err(ActionError::Collision(PieceCollisionError)) => {
                    ActionOutcome::Locked(self.pieces.lock(&mut self.board)?)
                }
                res => res?,
            },
            Action::RotateCw => self.try_rotate(RotationDirection::Clockwise)?,
            Action::RotateCcw => self.try_rotate(RotationDirection::CounterClockwise)?,
            Action::Rotate180 => self.try_rotate(RotationDirection::Half)?,
            Action::Hold => {
                self.pieces.try_hold(&self.board)?;
                ActionOutcome::Held
            }
            Action::HardDrop => ActionOutcome::Locked(self.pieces.hard_drop(&mut self.board)?),
        };
        if let ActionOutcome::Locked(lock) = outcome {
            self.record_lock(lock);
        }
        Ok(outcome)
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> Result<ActionOutcome, ActionError> {
        self.pieces.try_move(&self.board, dx, dy)?;
        Ok(ActionOutcome::Moved)
    }

    fn try_rotate(&mut self, direction: RotationDirection) -> Result<ActionOutcome, ActionError> {
        let kick = self.pieces.try_rotate(&self.board, direction)?;
        Ok(ActionOutcome::Rotated { kick })
    }

    fn record_lock(&mut self, lock: LockOutcome) {
        // A lock-out never reaches the board, so it is not counted.
        if !lock.locked().is_above_board() {
            self.stats.record_lock(lock.cleared_lines());
        }
        if lock.topped_out() {
            info!(
                seed = %self.seed,
                locked_pieces = self.stats.locked_pieces(),
                lines = self.stats.total_cleared_lines(),
                "game over"
            );
        }
    }
}
