use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    ActionError, HoldError, PieceCollisionError,
    core::{
        board::Board,
        collision::collides,
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::randomizer::Randomizer;

/// Lifecycle phase of the active piece.
///
/// Hold availability lives inside the phases that have a live piece, so it
/// cannot drift out of sync with the phase itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PiecePhase {
    /// Freshly placed at the spawn position and not yet moved.
    Spawned { hold_available: bool },
    /// Moved or rotated at least once since spawning.
    Falling { hold_available: bool },
    /// Being merged into the board. Only observable from inside [`PieceStateMachine::lock`].
    Locking,
    /// A new piece could not be placed; the game is over.
    ToppedOut,
}

impl PiecePhase {
    /// Returns the hold flag of a live piece, or `None` once the game is over.
    #[must_use]
    pub fn hold_available(self) -> Option<bool> {
        match self {
            PiecePhase::Spawned { hold_available } | PiecePhase::Falling { hold_available } => {
                Some(hold_available)
            }
            PiecePhase::Locking | PiecePhase::ToppedOut => None,
        }
    }
}

/// Result of locking a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    locked: Piece,
    cleared_lines: usize,
    topped_out: bool,
}

impl LockOutcome {
    /// The piece as it was committed.
    #[must_use]
    pub fn locked(&self) -> Piece {
        self.locked
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// `true` if the game ended with this lock.
    #[must_use]
    pub fn topped_out(&self) -> bool {
        self.topped_out
    }
}

/// Owns the active piece, the hold slot and the bag.
///
/// The board is not owned here: every operation borrows it from the caller
/// (normally [`GameSession`](super::GameSession)), and the only operation that
/// mutates it is [`Self::lock`], which goes through [`Board::merge`] and
/// [`Board::clear_full_rows`].
///
/// All moves and rotations are checked with [`collides`] first; a rejected
/// request returns an error and leaves the state untouched.
#[derive(Debug, Clone)]
pub struct PieceStateMachine {
    active: Piece,
    held: Option<PieceKind>,
    phase: PiecePhase,
    randomizer: Randomizer,
}

impl PieceStateMachine {
    /// Spawns the first piece from `randomizer` onto `board`.
    #[must_use]
    pub fn new(mut randomizer: Randomizer, board: &Board) -> Self {
        let mut this = Self {
            active: Piece::new(randomizer.next_kind()),
            held: None,
            phase: PiecePhase::Locking,
            randomizer,
        };
        this.enter_spawned(board, true);
        this
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active
    }

    #[must_use]
    pub fn held_kind(&self) -> Option<PieceKind> {
        self.held
    }

    #[must_use]
    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    #[must_use]
    pub fn randomizer(&self) -> &Randomizer {
        &self.randomizer
    }

    fn live_hold_flag(&self) -> Result<bool, ActionError> {
        self.phase.hold_available().ok_or(ActionError::ToppedOut)
    }

    fn commit(&mut self, piece: Piece, hold_available: bool) {
        self.active = piece;
        self.phase = PiecePhase::Falling { hold_available };
    }

    /// Sets the phase after `self.active` was replaced by a fresh piece.
    fn enter_spawned(&mut self, board: &Board, hold_available: bool) {
        if collides(board, &self.active) {
            debug!(piece = %self.active, "spawn blocked, topping out");
            self.phase = PiecePhase::ToppedOut;
        } else {
            self.phase = PiecePhase::Spawned { hold_available };
        }
    }

    /// Moves the active piece by `(dx, dy)` if the target is free.
    pub fn try_move(&mut self, board: &Board, dx: i32, dy: i32) -> Result<(), ActionError> {
        let hold_available = self.live_hold_flag()?;
        let candidate = self.active.moved(dx, dy);
        if collides(board, &candidate) {
            return Err(PieceCollisionError.into());
        }
        self.commit(candidate, hold_available);
        Ok(())
    }

    /// Rotates the active piece, trying each wall kick in table order.
    ///
    /// Returns the index of the kick that was used.
    pub fn try_rotate(
        &mut self,
        board: &Board,
        direction: RotationDirection,
    ) -> Result<usize, ActionError> {
        let hold_available = self.live_hold_flag()?;
        let (candidate, kick) = self
            .active
            .super_rotated(board, direction)
            .ok_or(PieceCollisionError)?;
        if kick > 0 {
            trace!(from = %self.active, to = %candidate, kick, "wall kick");
        }
        self.commit(candidate, hold_available);
        Ok(kick)
    }

    /// Returns how far the active piece can fall. Does not move it.
    #[must_use]
    pub fn hard_drop_distance(&self, board: &Board) -> usize {
        self.active.hard_drop_distance(board)
    }

    /// Commits the active piece to the board and spawns the next one.
    ///
    /// Full rows are cleared and the hold flag is re-enabled. If the piece
    /// still has cells above row 0 it cannot be merged; the board is left as is
    /// and the game tops out. If the next piece collides at the spawn position
    /// the game tops out as well.
    pub fn lock(&mut self, board: &mut Board) -> Result<LockOutcome, ActionError> {
        self.live_hold_flag()?;
        let locked = self.active;
        self.phase = PiecePhase::Locking;

        if locked.is_above_board() {
            debug!(piece = %locked, "piece locked above the board, topping out");
            self.phase = PiecePhase::ToppedOut;
            return Ok(LockOutcome {
                locked,
                cleared_lines: 0,
                topped_out: true,
            });
        }

        board.merge(&locked);
        let cleared_lines = board.clear_full_rows();
        debug!(piece = %locked, cleared_lines, "piece locked");

        self.active = Piece::new(self.randomizer.next_kind());
        self.enter_spawned(board, true);
        Ok(LockOutcome {
            locked,
            cleared_lines,
            topped_out: self.phase.is_topped_out(),
        })
    }

    /// Drops the active piece as far as it goes and locks it.
    ///
    /// Distance, move and lock happen under one exclusive borrow, so nothing
    /// can change the board in between.
    pub fn hard_drop(&mut self, board: &mut Board) -> Result<LockOutcome, ActionError> {
        let hold_available = self.live_hold_flag()?;
        let dropped = self.active.dropped(board);
        self.commit(dropped, hold_available);
        self.lock(board)
    }

    /// Swaps the active piece with the hold slot.
    ///
    /// With an empty slot, the active kind is stored and the next kind is dealt
    /// from the bag. Otherwise the held kind comes back at the spawn position in
    /// rotation state 0. Either way hold is unavailable until the next lock.
    ///
    /// Rejected, with nothing changed, if hold was already used this turn or
    /// the incoming piece would collide at the spawn position.
    pub fn try_hold(&mut self, board: &Board) -> Result<(), ActionError> {
        if !self.live_hold_flag()? {
            return Err(HoldError::HoldAlreadyUsed.into());
        }

        let incoming = Piece::new(self.held.unwrap_or_else(|| self.randomizer.peek()));
        if collides(board, &incoming) {
            return Err(HoldError::PieceCollision(PieceCollisionError).into());
        }

        let stored = self.active.kind();
        if self.held.replace(stored).is_none() {
            self.randomizer.next_kind();
        }
        debug!(stored = ?stored, incoming = ?incoming.kind(), "hold");
        self.active = incoming;
        self.phase = PiecePhase::Spawned {
            hold_available: false,
        };
        Ok(())
    }
}
