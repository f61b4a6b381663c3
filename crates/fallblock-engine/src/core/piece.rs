use std::fmt;

use serde::{Serialize, Serializer};

use super::{
    board::{Board, Cell},
    collision::collides,
    kick,
};

/// The active piece: a kind in one rotation state at a board-relative position.
///
/// `Piece` is a plain value. Movement and rotation return new pieces and never
/// consult the board on their own; the collision-checked variants
/// ([`Self::super_rotated`], [`Self::hard_drop_distance`]) take the board
/// explicitly.
///
/// # Coordinate System
///
/// - The position is the board cell under the top-left corner of the piece's
///   4×4 shape matrix
/// - X grows rightward, Y grows downward, row 0 is the top of the board
/// - Positions may be negative: shape matrices carry empty margins, and cells
///   may sit above row 0
///
/// # Example
///
/// ```
/// use fallblock_engine::{Piece, PieceKind, RotationDirection};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.moved(1, 0);
/// let rotated = moved.rotated(RotationDirection::Clockwise);
/// assert_eq!(rotated.position().x(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl fmt::Display for Piece {
    // Format: "kind#rotation@x,y" (e.g. "S#R@4,18")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.position.x,
            self.position.y
        )
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Piece {
    /// Creates a piece of the given kind at the spawn position in rotation state 0.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN,
            rotation: PieceRotation::SPAWN,
            kind,
        }
    }

    #[must_use]
    pub const fn with_placement(
        kind: PieceKind,
        rotation: PieceRotation,
        position: PiecePosition,
    ) -> Self {
        Self {
            position,
            rotation,
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &'static PieceShape {
        self.kind.shape(self.rotation)
    }

    /// Returns the board coordinates of the four occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    /// Returns `true` if any occupied cell lies above row 0.
    #[must_use]
    pub fn is_above_board(&self) -> bool {
        self.occupied_positions().any(|(_, y)| y < 0)
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }

    /// Rotates in place without wall kicks or collision checks.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            rotation: self.rotation.rotated(direction),
            ..*self
        }
    }

    /// Rotates with wall kicks.
    ///
    /// Each kick offset for the piece's kick class and the `from>>to`
    /// transition is tried in table order; the first non-colliding candidate
    /// wins. Returns the rotated piece together with the index of the kick that
    /// was used, or `None` if every candidate collides.
    #[must_use]
    pub fn super_rotated(
        self,
        board: &Board,
        direction: RotationDirection,
    ) -> Option<(Self, usize)> {
        let rotated = self.rotated(direction);
        kick::kick_offsets(self.kind, self.rotation, rotated.rotation)
            .iter()
            .map(|&kick| {
                let (dx, dy) = kick::board_offset(kick);
                rotated.moved(dx, dy)
            })
            .enumerate()
            .find_map(|(index, candidate)| {
                (!collides(board, &candidate)).then_some((candidate, index))
            })
    }

    /// Returns how many rows the piece can fall before it would collide.
    ///
    /// This is a pure query; the piece itself is not moved.
    #[must_use]
    pub fn hard_drop_distance(&self, board: &Board) -> usize {
        let mut distance = 0;
        while !collides(board, &self.moved(0, drop_rows(distance + 1))) {
            distance += 1;
        }
        distance
    }

    /// Returns the piece moved down by [`Self::hard_drop_distance`].
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        self.moved(0, drop_rows(self.hard_drop_distance(board)))
    }
}

// The floor stops any drop within `Board::HEIGHT + 4` rows, so this never saturates in practice.
fn drop_rows(distance: usize) -> i32 {
    i32::try_from(distance).unwrap_or(i32::MAX)
}

/// Board-relative position of a piece's shape matrix origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    /// Where every new piece appears: column 3, row 0.
    pub const SPAWN: Self = Self::new(3, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
    Half,
}

impl RotationDirection {
    const fn quarter_turns(self) -> u8 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::Half => 2,
            RotationDirection::CounterClockwise => 3,
        }
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `R`: one quarter turn clockwise
/// - `2`: half turn
/// - `L`: one quarter turn counterclockwise
///
/// Rotation wraps around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl fmt::Display for PieceRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            0 => "0",
            1 => "R",
            2 => "2",
            _ => "L",
        })
    }
}

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Creates a rotation state from an index, reduced modulo 4.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        Self((self.0 + direction.quarter_turns()) % 4)
    }
}

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// Every kind, in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> &'static PieceShape {
        &PIECE_SHAPES[self.index()][rotation.index()]
    }

    /// Returns the shape-local `(dx, dy)` offsets of the occupied cells.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        (0..).zip(self.shape(rotation)).flat_map(|(dy, row)| {
            (0..)
                .zip(row)
                .filter(|(_, cell)| !cell.is_empty())
                .map(move |(dx, _)| (dx, dy))
        })
    }

    /// Returns the lowest occupied row offset within the shape matrix.
    #[must_use]
    pub fn lowest_row_offset(self, rotation: PieceRotation) -> i32 {
        self.occupied_offsets(rotation)
            .map(|(_, dy)| dy)
            .max()
            .unwrap_or(0)
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use fallblock_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use fallblock_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Piece shape as a 4×4 cell matrix, row-major, row 0 on top.
pub type PieceShape = [[Cell; 4]; 4];

/// Generates all 4 rotation states of a shape by rotating 90° clockwise
/// about the center of its `size`×`size` top-left box.
const fn shape_rotations(size: usize, shape: &PieceShape) -> [PieceShape; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[Cell::Empty; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    use Cell::Empty as E;
    const I: Cell = Cell::Piece(PieceKind::I);
    const O: Cell = Cell::Piece(PieceKind::O);
    const S: Cell = Cell::Piece(PieceKind::S);
    const Z: Cell = Cell::Piece(PieceKind::Z);
    const J: Cell = Cell::Piece(PieceKind::J);
    const L: Cell = Cell::Piece(PieceKind::L);
    const T: Cell = Cell::Piece(PieceKind::T);
    const EEEE: [Cell; 4] = [E; 4];
    [
        // I-piece. Horizontal states sit one row higher than in guideline SRS,
        // so a freshly spawned I occupies the spawn row itself.
        [
            [[I, I, I, I], EEEE, EEEE, EEEE],
            [[E, E, I, E]; 4],
            [EEEE, [I, I, I, I], EEEE, EEEE],
            [[E, I, E, E]; 4],
        ],
        // O-piece
        [[[E, O, O, E], [E, O, O, E], EEEE, EEEE]; 4],
        // S-piece
        shape_rotations(3, &[[E, S, S, E], [S, S, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[J, E, E, E], [J, J, J, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, L, E], [L, L, L, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, T, E, E], [T, T, T, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(kind: PieceKind, rotation: u8) -> Vec<(i32, i32)> {
        kind.occupied_offsets(PieceRotation::from_index(rotation))
            .collect()
    }

    #[test]
    fn test_every_shape_has_four_cells_of_its_kind() {
        for kind in PieceKind::ALL {
            for rotation in PieceRotation::ALL {
                let shape = kind.shape(rotation);
                let cells: Vec<_> = shape.iter().flatten().filter(|c| !c.is_empty()).collect();
                assert_eq!(cells.len(), 4, "{kind:?} rotation {rotation}");
                assert!(cells.iter().all(|c| **c == Cell::Piece(kind)));
            }
        }
    }

    #[test]
    fn test_t_piece_rotates_clockwise() {
        assert_eq!(offsets(PieceKind::T, 0), [(1, 0), (0, 1), (1, 1), (2, 1)]);
        // R: pointing right
        assert_eq!(offsets(PieceKind::T, 1), [(1, 0), (1, 1), (2, 1), (1, 2)]);
        // 2: pointing down
        assert_eq!(offsets(PieceKind::T, 2), [(0, 1), (1, 1), (2, 1), (1, 2)]);
        // L: pointing left
        assert_eq!(offsets(PieceKind::T, 3), [(1, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_i_piece_states() {
        assert_eq!(offsets(PieceKind::I, 0), [(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(offsets(PieceKind::I, 1), [(2, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(offsets(PieceKind::I, 2), [(0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(offsets(PieceKind::I, 3), [(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let spawn = offsets(PieceKind::O, 0);
        for rotation in 1..4 {
            assert_eq!(offsets(PieceKind::O, rotation), spawn);
        }
    }

    #[test]
    fn test_rotation_arithmetic() {
        use RotationDirection::{Clockwise, CounterClockwise, Half};

        let spawn = PieceRotation::SPAWN;
        assert_eq!(spawn.rotated(Clockwise).index(), 1);
        assert_eq!(spawn.rotated(CounterClockwise).index(), 3);
        assert_eq!(spawn.rotated(Half).index(), 2);
        assert_eq!(
            spawn.rotated(CounterClockwise).rotated(Clockwise),
            PieceRotation::SPAWN
        );

        let mut rotation = spawn;
        for _ in 0..4 {
            rotation = rotation.rotated(Clockwise);
        }
        assert_eq!(rotation, spawn);
    }

    #[test]
    fn test_lowest_row_offset() {
        assert_eq!(PieceKind::I.lowest_row_offset(PieceRotation::SPAWN), 0);
        assert_eq!(PieceKind::T.lowest_row_offset(PieceRotation::SPAWN), 1);
        assert_eq!(
            PieceKind::I.lowest_row_offset(PieceRotation::from_index(1)),
            3
        );
    }

    #[test]
    fn test_piece_display_and_serialization() {
        let piece = Piece::with_placement(
            PieceKind::S,
            PieceRotation::from_index(1),
            PiecePosition::new(4, 18),
        );
        assert_eq!(piece.to_string(), "S#R@4,18");
        assert_eq!(serde_json::to_string(&piece).unwrap(), "\"S#R@4,18\"");

        let piece = Piece::with_placement(
            PieceKind::I,
            PieceRotation::from_index(3),
            PiecePosition::new(-1, -2),
        );
        assert_eq!(piece.to_string(), "I#L@-1,-2");
    }

    #[test]
    fn test_occupied_positions_follow_position() {
        let piece = Piece::new(PieceKind::O).moved(2, 5);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, [(6, 5), (7, 5), (6, 6), (7, 6)]);
        assert!(!piece.is_above_board());
        assert!(piece.moved(0, -6).is_above_board());
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('i'), None);
    }
}
