use std::fmt;

use serde::Serialize;

/// One player input, applied to a [`GameSession`](super::GameSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    /// Moves down one row, or locks the piece if it cannot.
    SoftDrop,
    RotateCw,
    RotateCcw,
    Rotate180,
    Hold,
    HardDrop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::MoveLeft => "move-left",
            Action::MoveRight => "move-right",
            Action::SoftDrop => "soft-drop",
            Action::RotateCw => "rotate-cw",
            Action::RotateCcw => "rotate-ccw",
            Action::Rotate180 => "rotate-180",
            Action::Hold => "hold",
            Action::HardDrop => "hard-drop",
        };
        f.write_str(name)
    }
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Rotate180,
        Action::Hold,
        Action::HardDrop,
    ];

    /// Maps a script character to an action.
    ///
    /// | char    | action      |
    /// |---------|-------------|
    /// | `<`     | move left   |
    /// | `>`     | move right  |
    /// | `v`     | soft drop   |
    /// | `x`     | rotate CW   |
    /// | `z`     | rotate CCW  |
    /// | `a`     | rotate 180  |
    /// | `c`     | hold        |
    /// | space   | hard drop   |
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        let action = match c {
            '<' => Action::MoveLeft,
            '>' => Action::MoveRight,
            'v' => Action::SoftDrop,
            'x' => Action::RotateCw,
            'z' => Action::RotateCcw,
            'a' => Action::Rotate180,
            'c' => Action::Hold,
            ' ' => Action::HardDrop,
            _ => return None,
        };
        Some(action)
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Action::MoveLeft => '<',
            Action::MoveRight => '>',
            Action::SoftDrop => 'v',
            Action::RotateCw => 'x',
            Action::RotateCcw => 'z',
            Action::Rotate180 => 'a',
            Action::Hold => 'c',
            Action::HardDrop => ' ',
        }
    }

    /// Parses an action script, skipping characters that map to no action.
    pub fn parse_script(script: &str) -> impl Iterator<Item = Action> + '_ {
        script.chars().filter_map(Action::from_char)
    }
}
