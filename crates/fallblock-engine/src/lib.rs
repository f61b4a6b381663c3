//! Game-state engine for a falling-block puzzle.
//!
//! - [`core`] - Static data and pure checks: piece catalog, wall-kick tables,
//!   the board and the collision oracle
//! - [`engine`] - Stateful parts: bag randomizer, piece state machine and the
//!   game session that ties them to a board
//!
//! Nothing here renders, reads input or keeps time. A driver calls one
//! operation per event (gravity tick or input action) and reads the result
//! back through [`GameSession::snapshot`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding at the requested position")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("piece colliding when holding piece")]
    PieceCollision(PieceCollisionError),
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
}

/// Why an action was declined. State is unchanged whenever this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ActionError {
    #[display("{_0}")]
    Collision(PieceCollisionError),
    #[display("{_0}")]
    Hold(HoldError),
    #[display("game has topped out")]
    ToppedOut,
}

impl From<PieceCollisionError> for ActionError {
    fn from(err: PieceCollisionError) -> Self {
        ActionError::Collision(err)
    }
}

impl From<HoldError> for ActionError {
    fn from(err: HoldError) -> Self {
        ActionError::Hold(err)
    }
}
