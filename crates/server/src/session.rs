//! The single game context: seats plus the authoritative game.
//!
//! Handlers here are synchronous and return the events to deliver instead of
//! writing to sockets; the hub owns the sockets and delivers them in order.

use chess_core::{
    Game, GameOver, GameStatus, MoveOutcome, MoveRequest, PlayerRole, ServerEvent, Side,
};

use crate::error::MoveRejection;
use crate::registry::{ConnId, SessionRegistry};

/// Where an outgoing event goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Broadcast(ServerEvent),
    Direct(ConnId, ServerEvent),
}

pub struct Session {
    registry: SessionRegistry,
    game: Game,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Game::new())
    }
}

impl Session {
    pub fn new(game: Game) -> Self {
        Self {
            registry: SessionRegistry::new(),
            game,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Seat the newcomer and bring it up to date.
    pub fn connect(&mut self, conn: ConnId) -> Vec<Dispatch> {
        let role = self.registry.assign_role(conn);
        let mut out = Vec::with_capacity(4);

        match role {
            PlayerRole::Player(side) => {
                tracing::info!(conn, side = ?side, "Player seated");
                out.push(Dispatch::Direct(conn, ServerEvent::PlayerRole(side)));
                if let Some(token) = self.registry.token_for(conn) {
                    out.push(Dispatch::Direct(conn, ServerEvent::SeatToken(token.to_string())));
                }
            }
            PlayerRole::Spectator => {
                tracing::info!(conn, "Spectator joined");
                out.push(Dispatch::Direct(conn, ServerEvent::SpectatorRole));
            }
        }

        out.push(Dispatch::Direct(conn, ServerEvent::BoardState(self.game.snapshot())));

        if let GameStatus::Concluded(terminal) = self.game.status() {
            out.push(Dispatch::Direct(conn, ServerEvent::GameOver(terminal.into())));
        }
        out
    }

    /// Free the seat, if any. Remaining participants are not told.
    pub fn disconnect(&mut self, conn: ConnId) {
        match self.registry.release_role(conn) {
            Some(side) => tracing::info!(conn, side = ?side, "Player left, seat is free"),
            None => tracing::info!(conn, "Spectator left"),
        }
    }

    /// Turn check, then hand the move to the game.
    pub fn submit_move(&mut self, conn: ConnId, request: MoveRequest) -> Vec<Dispatch> {
        tracing::info!(
            conn,
            from = %request.intent.from,
            to = %request.intent.to,
            turn = ?self.game.turn(),
            "Move received"
        );

        match self.try_move(conn, &request) {
            Ok(out) => out,
            Err(rejection) => {
                tracing::info!(conn, %rejection, "Move rejected");
                vec![Self::reject(conn, rejection)]
            }
        }
    }

    /// Private notice for a frame that was not a recognisable client event.
    pub fn malformed(&self, conn: ConnId) -> Vec<Dispatch> {
        vec![Self::reject(conn, MoveRejection::IllegalMove)]
    }

    fn try_move(
        &mut self,
        conn: ConnId,
        request: &MoveRequest,
    ) -> Result<Vec<Dispatch>, MoveRejection> {
        if self.game.is_concluded() {
            return Err(MoveRejection::GameConcluded);
        }

        let side = Side::from(self.game.turn());
        if self.registry.occupant(side) != Some(conn) {
            return Err(MoveRejection::NotYourTurn);
        }
        if !self.registry.verify_token(side, request.token.as_deref()) {
            return Err(MoveRejection::InvalidToken);
        }

        match self.game.apply_move(&request.intent) {
            MoveOutcome::Applied { snapshot, terminal } => {
                tracing::info!(conn, fen = %snapshot, "Move applied");
                let mut out = vec![
                    Dispatch::Broadcast(ServerEvent::Move(request.intent.clone())),
                    Dispatch::Broadcast(ServerEvent::BoardState(snapshot)),
                ];
                if let Some(terminal) = terminal {
                    let over = GameOver::from(terminal);
                    tracing::info!(result = ?over, "Game over");
                    out.push(Dispatch::Broadcast(ServerEvent::GameOver(over)));
                }
                Ok(out)
            }
            MoveOutcome::Rejected => Err(MoveRejection::IllegalMove),
        }
    }

    fn reject(conn: ConnId, rejection: MoveRejection) -> Dispatch {
        Dispatch::Direct(conn, ServerEvent::MoveError(rejection.to_string()))
    }
}
