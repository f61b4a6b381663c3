//! Wall-kick tables.
//!
//! Offsets are stored the way SRS tables are published: `(dx, dy)` with `y`
//! growing upward. [`board_offset`] flips `dy` for the board's downward `y`.
//! Quarter turns use the standard SRS tables; half turns use the SRS+ 180°
//! tables.

use super::piece::{PieceKind, PieceRotation};

/// A single kick candidate, `(dx, dy)` with `y` growing upward.
pub type Kick = (i8, i8);

const JLSTZ_0R: [Kick; 5] = [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];
const JLSTZ_R0: [Kick; 5] = [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];
const JLSTZ_R2: [Kick; 5] = [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)];
const JLSTZ_2R: [Kick; 5] = [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)];
const JLSTZ_2L: [Kick; 5] = [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];
const JLSTZ_L2: [Kick; 5] = [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_L0: [Kick; 5] = [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)];
const JLSTZ_0L: [Kick; 5] = [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)];

const JLSTZ_02: [Kick; 6] = [(0, 0), (0, 1), (1, 1), (-1, 1), (1, 0), (-1, 0)];
const JLSTZ_20: [Kick; 6] = [(0, 0), (0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0)];
const JLSTZ_RL: [Kick; 6] = [(0, 0), (1, 0), (1, 2), (1, 1), (0, 2), (0, 1)];
const JLSTZ_LR: [Kick; 6] = [(0, 0), (-1, 0), (-1, 2), (-1, 1), (0, 2), (0, 1)];

const I_0R: [Kick; 5] = [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)];
const I_R0: [Kick; 5] = [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)];
const I_R2: [Kick; 5] = [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)];
const I_2R: [Kick; 5] = [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)];
const I_2L: [Kick; 5] = [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)];
const I_L2: [Kick; 5] = [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)];
const I_L0: [Kick; 5] = [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)];
const I_0L: [Kick; 5] = [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)];

const I_02: [Kick; 4] = [(0, 0), (0, 1), (1, 0), (-1, 0)];
const I_20: [Kick; 4] = [(0, 0), (0, -1), (-1, 0), (1, 0)];
const I_RL: [Kick; 4] = [(0, 0), (1, 0), (0, 1), (0, -1)];
const I_LR: [Kick; 4] = [(0, 0), (-1, 0), (0, 1), (0, -1)];

/// Which kick table a piece kind uses.
///
/// The I-piece pivots differently from the 3×3 pieces, so it gets its own
/// table. The O-piece shares the JLSTZ table; its footprint never changes, so
/// the identity kick always decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickClass {
    I,
    Jlstz,
}

impl KickClass {
    #[must_use]
    pub const fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => KickClass::I,
            _ => KickClass::Jlstz,
        }
    }
}

/// Returns the ordered kick candidates for rotating `kind` from `from` to `to`.
///
/// # Panics
///
/// Panics if `from == to`: there is no kick entry for a rotation onto the same
/// state, and asking for one is a caller bug.
#[must_use]
pub fn kick_offsets(kind: PieceKind, from: PieceRotation, to: PieceRotation) -> &'static [Kick] {
    let key = (from.index(), to.index());
    match KickClass::of(kind) {
        KickClass::Jlstz => match key {
            (0, 1) => &JLSTZ_0R,
            (1, 0) => &JLSTZ_R0,
            (1, 2) => &JLSTZ_R2,
            (2, 1) => &JLSTZ_2R,
            (2, 3) => &JLSTZ_2L,
            (3, 2) => &JLSTZ_L2,
            (3, 0) => &JLSTZ_L0,
            (0, 3) => &JLSTZ_0L,
            (0, 2) => &JLSTZ_02,
            (2, 0) => &JLSTZ_20,
            (1, 3) => &JLSTZ_RL,
            (3, 1) => &JLSTZ_LR,
            _ => panic!("no kick entry for rotation {from}>>{to}"),
        },
        KickClass::I => match key {
            (0, 1) => &I_0R,
            (1, 0) => &I_R0,
            (1, 2) => &I_R2,
            (2, 1) => &I_2R,
            (2, 3) => &I_2L,
            (3, 2) => &I_L2,
            (3, 0) => &I_L0,
            (0, 3) => &I_0L,
            (0, 2) => &I_02,
            (2, 0) => &I_20,
            (1, 3) => &I_RL,
            (3, 1) => &I_LR,
            _ => panic!("no kick entry for rotation {from}>>{to}"),
        },
    }
}

/// Converts a table kick into a board offset (`y` grows downward).
#[must_use]
pub fn board_offset((dx, dy): Kick) -> (i32, i32) {
    (i32::from(dx), -i32::from(dy))
}
