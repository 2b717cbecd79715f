//! Seat bookkeeping: which connection plays White, which plays Black.
//!
//! Spectators are not tracked at all; anyone who does not get a seat just
//! watches.

use chess_core::{PlayerRole, Side};
use rand::Rng;

/// Identifier the hub hands out to each WebSocket connection.
pub type ConnId = u64;

#[derive(Clone, Debug)]
struct Seat {
    conn: ConnId,
    token: String,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    white: Option<Seat>,
    black: Option<Seat>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// White if free, else Black if free, else spectator.
    pub fn assign_role(&mut self, conn: ConnId) -> PlayerRole {
        let side = if self.white.is_none() {
            Side::White
        } else if self.black.is_none() {
            Side::Black
        } else {
            return PlayerRole::Spectator;
        };

        *self.slot_mut(side) = Some(Seat {
            conn,
            token: generate_token(),
        });
        PlayerRole::Player(side)
    }

    /// Free whichever seat `conn` holds. No-op for spectators.
    pub fn release_role(&mut self, conn: ConnId) -> Option<Side> {
        for side in [Side::White, Side::Black] {
            let slot = self.slot_mut(side);
            if slot.as_ref().is_some_and(|seat| seat.conn == conn) {
                *slot = None;
                return Some(side);
            }
        }
        None
    }

    /// Connection currently seated on `side`.
    pub fn occupant(&self, side: Side) -> Option<ConnId> {
        self.slot(side).as_ref().map(|seat| seat.conn)
    }

    /// Seat token issued to `conn`, if it holds a seat.
    pub fn token_for(&self, conn: ConnId) -> Option<&str> {
        [&self.white, &self.black]
            .into_iter()
            .flatten()
            .find(|seat| seat.conn == conn)
            .map(|seat| seat.token.as_str())
    }

    /// Whether `token` is the one issued for the seat on `side`.
    pub fn verify_token(&self, side: Side, token: Option<&str>) -> bool {
        match (self.slot(side), token) {
            (Some(seat), Some(token)) => seat.token == token,
            _ => false,
        }
    }

    fn slot(&self, side: Side) -> &Option<Seat> {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Seat> {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

/// 32 random lowercase alphanumerics.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| {
            let idx = rng.gen_range(0..36u8);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_two_connections_get_seats() {
        let mut reg = SessionRegistry::new();
        assert_eq!(reg.assign_role(1), PlayerRole::Player(Side::White));
        assert_eq!(reg.assign_role(2), PlayerRole::Player(Side::Black));
        assert_eq!(reg.assign_role(3), PlayerRole::Spectator);
        assert_eq!(reg.assign_role(4), PlayerRole::Spectator);

        assert_eq!(reg.occupant(Side::White), Some(1));
        assert_eq!(reg.occupant(Side::Black), Some(2));
    }

    #[test]
    fn released_seat_goes_to_next_newcomer() {
        let mut reg = SessionRegistry::new();
        reg.assign_role(1);
        reg.assign_role(2);
        reg.assign_role(3);

        assert_eq!(reg.release_role(1), Some(Side::White));
        assert_eq!(reg.occupant(Side::White), None);

        // Existing spectator is not promoted; the next connection is.
        assert_eq!(reg.assign_role(4), PlayerRole::Player(Side::White));
        assert_eq!(reg.occupant(Side::White), Some(4));
    }

    #[test]
    fn releasing_a_spectator_is_noop() {
        let mut reg = SessionRegistry::new();
        reg.assign_role(1);
        reg.assign_role(2);
        reg.assign_role(3);

        assert_eq!(reg.release_role(3), None);
        assert_eq!(reg.occupant(Side::White), Some(1));
        assert_eq!(reg.occupant(Side::Black), Some(2));
    }

    #[test]
    fn tokens_are_per_seat() {
        let mut reg = SessionRegistry::new();
        reg.assign_role(1);
        reg.assign_role(2);

        let white = reg.token_for(1).unwrap().to_string();
        let black = reg.token_for(2).unwrap().to_string();
        assert_eq!(white.len(), 32);
        assert_ne!(white, black);
        assert!(reg.token_for(3).is_none());

        assert!(reg.verify_token(Side::White, Some(&white)));
        assert!(!reg.verify_token(Side::White, Some(&black)));
        assert!(!reg.verify_token(Side::White, None));
    }

    #[test]
    fn reseating_issues_a_fresh_token() {
        let mut reg = SessionRegistry::new();
        reg.assign_role(1);
        let old = reg.token_for(1).unwrap().to_string();
        reg.release_role(1);
        reg.assign_role(2);
        assert!(!reg.verify_token(Side::White, Some(&old)));
    }
}
