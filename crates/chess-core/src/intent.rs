//! Move intents: (from, to, promotion?) triples in algebraic notation.

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, File, Move, Position, Role, Square};

/// A proposed move as it travels over the wire.
///
/// Squares are kept as raw strings so a malformed intent can still be
/// deserialized and then rejected like any other illegal move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

/// A move intent submitted by a seated player, together with the seat token
/// issued at role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(flatten)]
    pub intent: MoveIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl MoveIntent {
    /// Intent for a drag from `from` to `to`, promoting to a queen if it
    /// turns out to be a promotion.
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            promotion: Some("q".to_string()),
        }
    }

    /// Find the legal move in `pos` this intent describes.
    ///
    /// Castling is written as the king's two-square step (e1g1). The
    /// promotion letter is only looked at when the matching move promotes.
    pub fn resolve(&self, pos: &Chess) -> Option<Move> {
        let from: Square = self.from.parse().ok()?;
        let to: Square = self.to.parse().ok()?;

        let legals = pos.legal_moves();
        let candidate = legals
            .iter()
            .find(|m| standard_squares(m) == Some((from, to)))?;

        match candidate.promotion() {
            None => Some(candidate.clone()),
            Some(_) => {
                let wanted = promotion_role(self.promotion.as_deref())?;
                legals
                    .iter()
                    .find(|m| {
                        standard_squares(m) == Some((from, to)) && m.promotion() == Some(wanted)
                    })
                    .cloned()
            }
        }
    }
}

/// From/to squares of a move as a player would drag it.
pub fn standard_squares(m: &Move) -> Option<(Square, Square)> {
    match m {
        Move::Normal { from, to, .. } => Some((*from, *to)),
        Move::EnPassant { from, to } => Some((*from, *to)),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            Some((*king, Square::from_coords(file, king.rank())))
        }
        _ => None,
    }
}

fn promotion_role(letter: Option<&str>) -> Option<Role> {
    match letter.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("q") => Some(Role::Queen),
        Some("r") => Some(Role::Rook),
        Some("b") => Some(Role::Bishop),
        Some("n") => Some(Role::Knight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{fen::Fen, CastlingMode};

    fn intent(from: &str, to: &str, promotion: Option<&str>) -> MoveIntent {
        MoveIntent {
            from: from.to_string(),
            to: to.to_string(),
            promotion: promotion.map(str::to_string),
        }
    }

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    #[test]
    fn test_resolve_pawn_push_ignores_promotion_letter() {
        let pos = Chess::default();
        let m = intent("e2", "e4", Some("q")).resolve(&pos).unwrap();
        assert_eq!(standard_squares(&m), Some((Square::E2, Square::E4)));
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn test_resolve_rejects_three_square_pawn_move() {
        assert!(intent("e2", "e5", None).resolve(&Chess::default()).is_none());
    }

    #[test]
    fn test_resolve_rejects_malformed_squares() {
        assert!(intent("z9", "e4", None).resolve(&Chess::default()).is_none());
        assert!(intent("", "", None).resolve(&Chess::default()).is_none());
    }

    #[test]
    fn test_resolve_castling_as_king_step() {
        let pos = position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let short = intent("e1", "g1", None).resolve(&pos).unwrap();
        assert!(matches!(short, Move::Castle { .. }));
        let long = intent("e1", "c1", None).resolve(&pos).unwrap();
        assert!(matches!(long, Move::Castle { rook: Square::A1, .. }));
    }

    #[test]
    fn test_resolve_promotion_defaults_to_queen() {
        let pos = position("7k/P7/8/8/8/8/8/K7 w - - 0 1");
        let m = intent("a7", "a8", None).resolve(&pos).unwrap();
        assert_eq!(m.promotion(), Some(Role::Queen));
        let m = intent("a7", "a8", Some("N")).resolve(&pos).unwrap();
        assert_eq!(m.promotion(), Some(Role::Knight));
        assert!(intent("a7", "a8", Some("k")).resolve(&pos).is_none());
    }

    #[test]
    fn test_new_intent_defaults_to_queen() {
        let i = MoveIntent::new(Square::G2, Square::G4);
        assert_eq!(i.from, "g2");
        assert_eq!(i.to, "g4");
        assert_eq!(i.promotion.as_deref(), Some("q"));
    }

    #[test]
    fn test_move_request_flattens_intent() {
        let req: MoveRequest =
            serde_json::from_str(r#"{"from":"e2","to":"e4","promotion":"q","token":"abc"}"#)
                .unwrap();
        assert_eq!(req.intent, intent("e2", "e4", Some("q")));
        assert_eq!(req.token.as_deref(), Some("abc"));
    }
}
