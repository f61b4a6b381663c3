use std::fmt;

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind},
};

use super::{
    game_session::GameSession, game_stats::GameStats, piece_state::PiecePhase,
    randomizer::PieceSeed,
};

/// Read-only view of a session for renderers.
///
/// `board` is a copy with the active piece drawn on it; the session's own
/// board never contains the active piece. After a top-out, `board` is the bare
/// board, `ghost` is `None` and `active` is the piece that failed to spawn.
/// The phase is flattened into the
/// serialized form as `"phase"` and, while a piece is live, `"hold_available"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub active: Piece,
    pub ghost: Option<Piece>,
    pub held: Option<PieceKind>,
    pub upcoming: ArrayVec<PieceKind, { PieceKind::LEN }>,
    #[serde(flatten)]
    pub phase: PiecePhase,
    pub stats: GameStats,
    pub seed: PieceSeed,
}

impl Snapshot {
    #[must_use]
    pub fn capture(session: &GameSession) -> Self {
        let active = session.active_piece();
        let (board, ghost) = if session.is_topped_out() {
            (session.board().clone(), None)
        } else {
            (
                session.board().with_piece(&active),
                Some(session.ghost_piece()),
            )
        };
        Self {
            board,
            active,
            ghost,
            held: session.held_kind(),
            upcoming: session.upcoming().collect(),
            phase: session.phase(),
            stats: session.stats().clone(),
            seed: session.seed(),
        }
    }

    /// `false` once hold was used this turn, and after top-out.
    #[must_use]
    pub fn hold_available(&self) -> bool {
        self.phase.hold_available().unwrap_or(false)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = self.held.map_or('-', PieceKind::as_char);
        let upcoming: String = self.upcoming.iter().map(|kind| kind.as_char()).collect();
        writeln!(f, "hold: {held}  next: {upcoming}")?;
        write!(f, "{}", self.board)?;
        let status = if self.phase.is_topped_out() {
            "topped out"
        } else {
            "playing"
        };
        write!(
            f,
            "{status}  pieces: {}  lines: {}",
            self.stats.locked_pieces(),
            self.stats.total_cleared_lines()
        )
    }
}
