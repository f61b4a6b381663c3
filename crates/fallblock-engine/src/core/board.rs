use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use super::{collision::collides, piece::Piece, piece::PieceKind};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a locked piece of a specific kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns `.` for an empty cell and the kind letter otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}

type Row = [Cell; Board::WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; Board::WIDTH];

/// The 10×20 playfield.
///
/// Rows are stored top to bottom (row 0 is the top). The dimensions never
/// change and every cell always holds a valid [`Cell`].
///
/// The board is only mutated through [`Board::merge`] and
/// [`Board::clear_full_rows`]; rendering works on copies produced by
/// [`Board::with_piece`].
///
/// # Example
///
/// ```
/// use fallblock_engine::{Board, Cell, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::O).dropped(&board);
/// board.merge(&piece);
/// assert_eq!(board.cell_at(4, 19), Cell::Piece(PieceKind::O));
/// assert_eq!(board.clear_full_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; Board::HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; Board::HEIGHT],
    };

    /// Returns the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the board.
    #[must_use]
    pub fn cell_at(&self, x: usize, y: usize) -> Cell {
        assert!(
            x < Self::WIDTH && y < Self::HEIGHT,
            "cell ({x}, {y}) is outside the {}x{} board",
            Self::WIDTH,
            Self::HEIGHT
        );
        self.rows[y][x]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; Board::WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|cell| cell.is_empty())
    }

    /// Writes the piece's cells into the board.
    ///
    /// # Panics
    ///
    /// Panics if any cell of the piece lies outside the board (above row 0
    /// included) or lands on an occupied cell. Callers must have checked the
    /// placement with [`collides`] first.
    pub fn merge(&mut self, piece: &Piece) {
        assert!(
            !collides(self, piece) && !piece.is_above_board(),
            "cannot merge {piece}: placement is blocked or outside the board"
        );
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                unreachable!("placement was checked above");
            };
            self.rows[y][x] = Cell::Piece(piece.kind());
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows above a removed row shift down; the same number of empty rows are
    /// inserted at the top so the height stays [`Self::HEIGHT`].
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Returns a copy of the board with the piece drawn on top.
    ///
    /// Cells outside the board are skipped and occupied cells are overwritten,
    /// so this is safe to call for any piece. `self` is not modified.
    #[must_use]
    pub fn with_piece(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if let Some(cell) = board.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = Cell::Piece(piece.kind());
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // One string per row, top to bottom: "..IIII...."
        let mut seq = serializer.serialize_seq(Some(Self::HEIGHT))?;
        for row in &self.rows {
            let line: String = row.iter().map(|cell| cell.as_char()).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("expected {} rows, got {found}", Board::HEIGHT)]
    RowCount { found: usize },
    #[display("row {row}: expected {} cells, got {found}", Board::WIDTH)]
    RowWidth { row: usize, found: usize },
    #[display("row {row}, column {column}: invalid cell {found:?}")]
    InvalidCell {
        row: usize,
        column: usize,
        found: char,
    },
}

/// Parses the [`Display`](fmt::Display) form: `HEIGHT` lines of `WIDTH`
/// characters, `.` for empty cells and kind letters for occupied ones.
/// Surrounding whitespace and blank lines are ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() != Self::HEIGHT {
            return Err(ParseBoardError::RowCount { found: lines.len() });
        }

        let mut board = Self::EMPTY;
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != Self::WIDTH {
                return Err(ParseBoardError::RowWidth { row: y, found });
            }
            for (x, c) in line.chars().enumerate() {
                board.rows[y][x] = Cell::from_char(c).ok_or(ParseBoardError::InvalidCell {
                    row: y,
                    column: x,
                    found: c,
                })?;
            }
        }
        Ok(board)
    }
}
