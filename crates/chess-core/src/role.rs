//! Seats at the board and who sits in them.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// One of the two playing colors, serialized as `"w"` / `"b"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Role a connection holds for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRole {
    Player(Side),
    Spectator,
}

impl PlayerRole {
    pub fn side(self) -> Option<Side> {
        match self {
            PlayerRole::Player(side) => Some(side),
            PlayerRole::Spectator => None,
        }
    }

    /// Black sees the board from the other end.
    pub fn is_flipped(self) -> bool {
        self == PlayerRole::Player(Side::Black)
    }
}
