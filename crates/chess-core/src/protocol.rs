//! Wire events exchanged over the game WebSocket.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`;
//! payload-less events omit `data`.

use serde::{Deserialize, Serialize};

use crate::game::{DrawReason, Terminal};
use crate::intent::{MoveIntent, MoveRequest};
use crate::role::Side;

/// Server → Client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    PlayerRole(Side),
    SpectatorRole,
    /// Capability the seated player must attach to every move.
    SeatToken(String),
    BoardState(String),
    Move(MoveIntent),
    GameOver(GameOver),
    MoveError(String),
}

/// Client → Server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Move(MoveRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GameOver {
    Checkmate { winner: Side },
    Draw { reason: DrawKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawKind {
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

impl From<DrawReason> for DrawKind {
    fn from(reason: DrawReason) -> Self {
        match reason {
            DrawReason::Stalemate => DrawKind::Stalemate,
            DrawReason::InsufficientMaterial => DrawKind::InsufficientMaterial,
            DrawReason::ThreefoldRepetition => DrawKind::ThreefoldRepetition,
            DrawReason::FiftyMoveRule => DrawKind::FiftyMoveRule,
        }
    }
}

impl From<Terminal> for GameOver {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Checkmate { winner } => GameOver::Checkmate {
                winner: winner.into(),
            },
            Terminal::Draw(reason) => GameOver::Draw {
                reason: reason.into(),
            },
        }
    }
}
