use super::{board::Board, piece::Piece};

/// Returns `true` if the piece cannot occupy its position on the board.
///
/// A cell collides when it is left of column 0, right of the last column,
/// below the last row, or on an occupied board cell. Cells above row 0 never
/// collide: pieces may spawn and rotate partly above the visible board.
///
/// The check is pure and is run before every tentative move or rotation.
#[must_use]
pub fn collides(board: &Board, piece: &Piece) -> bool {
    piece.occupied_positions().any(|(x, y)| {
        let Ok(x) = usize::try_from(x) else {
            return true;
        };
        if x >= Board::WIDTH {
            return true;
        }
        match usize::try_from(y) {
            Ok(y) => y >= Board::HEIGHT || !board.cell_at(x, y).is_empty(),
            Err(_) => false,
        }
    })
}
