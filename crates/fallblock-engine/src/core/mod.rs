pub use self::{board::*, collision::*, kick::*, piece::*};

pub(crate) mod board;
pub(crate) mod collision;
pub(crate) mod kick;
pub(crate) mod piece;
