//! Game engine logic and state management.
//!
//! This module orchestrates the core data structures into gameplay:
//!
//! - [`GameSession`] - Owns the board and dispatches [`Action`]s
//! - [`PieceStateMachine`] - Active piece, hold slot and phase
//! - [`Randomizer`] - 7-bag piece generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameStats`] - Lock and line-clear counters
//! - [`Snapshot`] - Read-only view for renderers
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`], optionally with a seed
//! 2. Feed it actions: moves, rotations, hold, soft and hard drops
//! 3. Locking merges the piece, clears full rows and spawns the next piece
//! 4. Repeat until a new piece cannot spawn (top-out)
//!
//! # Example
//!
//! ```
//! use fallblock_engine::{Action, ActionOutcome, GameSession};
//!
//! let mut session = GameSession::new();
//!
//! session.apply(Action::MoveLeft).ok();
//! session.apply(Action::RotateCw).ok();
//!
//! match session.apply(Action::HardDrop) {
//!     Ok(ActionOutcome::Locked(outcome)) => {
//!         assert!(!outcome.topped_out());
//!     }
//!     other => panic!("hard drop always locks on a fresh board: {other:?}"),
//! }
//! ```

pub use self::{
    action::*, game_session::*, game_stats::*, piece_state::*, randomizer::*, snapshot::*,
};

mod action;
mod game_session;
mod game_stats;
mod piece_state;
mod randomizer;
mod snapshot;
