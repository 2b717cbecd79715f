//! Rules-facing domain shared by the game server and the board client.

pub mod error;
pub mod game;
pub mod intent;
pub mod protocol;
pub mod role;

pub use error::CoreError;
pub use game::{DrawReason, Game, GameStatus, MoveOutcome, Terminal};
pub use intent::{MoveIntent, MoveRequest};
pub use protocol::{ClientEvent, GameOver, ServerEvent};
pub use role::{PlayerRole, Side};
