//! The authoritative game: one position, mutated in place, plus the
//! bookkeeping shakmaty does not keep for us (repetition counts and the
//! concluded/in-progress lifecycle).

use std::collections::HashMap;

use shakmaty::{fen::Fen, CastlingMode, Chess, Color, EnPassantMode, Position};

use crate::error::CoreError;
use crate::intent::MoveIntent;

/// Half-move clock value at which the fifty-move rule applies.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// `winner` is the side that delivered mate.
    Checkmate { winner: Color },
    Draw(DrawReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Concluded(Terminal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied {
        snapshot: String,
        terminal: Option<Terminal>,
    },
    /// Illegal or malformed; the position is unchanged.
    Rejected,
}

pub struct Game {
    pos: Chess,
    repetitions: HashMap<String, u32>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game at the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// A game starting from an arbitrary (legal) FEN.
    pub fn from_fen(fen: &str) -> Result<Self, CoreError> {
        Ok(Self::from_position(parse_position(fen)?))
    }

    fn from_position(pos: Chess) -> Self {
        let mut game = Self {
            pos,
            repetitions: HashMap::new(),
            status: GameStatus::InProgress,
        };
        game.record_repetition();
        if let Some(terminal) = game.detect_terminal() {
            game.status = GameStatus::Concluded(terminal);
        }
        game
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.status, GameStatus::Concluded(_))
    }

    /// Full FEN of the current position.
    pub fn snapshot(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// Apply `intent` if it is legal and the game is still running.
    pub fn apply_move(&mut self, intent: &MoveIntent) -> MoveOutcome {
        if self.is_concluded() {
            return MoveOutcome::Rejected;
        }
        let Some(mv) = intent.resolve(&self.pos) else {
            return MoveOutcome::Rejected;
        };

        self.pos.play_unchecked(mv);
        self.record_repetition();

        let terminal = self.detect_terminal();
        if let Some(t) = terminal {
            self.status = GameStatus::Concluded(t);
        }

        MoveOutcome::Applied {
            snapshot: self.snapshot(),
            terminal,
        }
    }

    fn record_repetition(&mut self) {
        let key = repetition_key(&self.snapshot());
        *self.repetitions.entry(key).or_insert(0) += 1;
    }

    fn detect_terminal(&self) -> Option<Terminal> {
        if self.pos.is_checkmate() {
            // The side left to move is the one that got mated.
            return Some(Terminal::Checkmate {
                winner: !self.pos.turn(),
            });
        }
        if self.pos.is_stalemate() {
            return Some(Terminal::Draw(DrawReason::Stalemate));
        }
        if self.pos.is_insufficient_material() {
            return Some(Terminal::Draw(DrawReason::InsufficientMaterial));
        }
        let seen = self
            .repetitions
            .get(&repetition_key(&self.snapshot()))
            .copied()
            .unwrap_or(0);
        if seen >= 3 {
            return Some(Terminal::Draw(DrawReason::ThreefoldRepetition));
        }
        if self.pos.halfmoves() >= FIFTY_MOVE_HALFMOVES {
            return Some(Terminal::Draw(DrawReason::FiftyMoveRule));
        }
        None
    }
}

/// Parse a FEN into a standard chess position.
pub fn parse_position(fen: &str) -> Result<Chess, CoreError> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| CoreError::InvalidFen(format!("{e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| CoreError::IllegalPosition(format!("{e}")))
}

/// Strips move counters from FEN, keeping only position + side + castling + ep.
fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}
