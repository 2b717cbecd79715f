//! Single-writer game task.
//!
//! All connects, moves and disconnects funnel through one mpsc channel into
//! the task that owns the [`Session`], so each event runs to completion before
//! the next one starts and moves are applied strictly in arrival order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chess_core::{MoveRequest, ServerEvent};
use tokio::sync::mpsc;

use crate::registry::ConnId;
use crate::session::{Dispatch, Session};

/// Per-connection outbox, drained by that connection's writer task.
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

#[derive(Debug)]
enum Command {
    Connect { conn: ConnId, outbox: Outbox },
    Disconnect { conn: ConnId },
    Move { conn: ConnId, request: MoveRequest },
    Malformed { conn: ConnId },
}

/// Cheap, cloneable handle to the game task.
#[derive(Clone)]
pub struct GameHandle {
    commands: mpsc::UnboundedSender<Command>,
    next_conn: Arc<AtomicU64>,
}

impl GameHandle {
    /// Spawn the game task around `session`.
    pub fn spawn(session: Session) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(session, rx));
        Self {
            commands: tx,
            next_conn: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next_conn_id(&self) -> ConnId {
        self.next_conn.fetch_add(1, Ordering::Relaxed)
    }

    pub fn connect(&self, conn: ConnId, outbox: Outbox) {
        self.send(Command::Connect { conn, outbox });
    }

    pub fn disconnect(&self, conn: ConnId) {
        self.send(Command::Disconnect { conn });
    }

    pub fn submit_move(&self, conn: ConnId, request: MoveRequest) {
        self.send(Command::Move { conn, request });
    }

    pub fn malformed(&self, conn: ConnId) {
        self.send(Command::Malformed { conn });
    }

    fn send(&self, cmd: Command) {
        if self.commands.send(cmd).is_err() {
            tracing::error!("Game task has stopped; dropping command");
        }
    }
}

async fn run(mut session: Session, mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut outboxes: HashMap<ConnId, Outbox> = HashMap::new();

    while let Some(cmd) = commands.recv().await {
        let dispatches = match cmd {
            Command::Connect { conn, outbox } => {
                outboxes.insert(conn, outbox);
                session.connect(conn)
            }
            Command::Disconnect { conn } => {
                outboxes.remove(&conn);
                session.disconnect(conn);
                Vec::new()
            }
            Command::Move { conn, request } => session.submit_move(conn, request),
            Command::Malformed { conn } => session.malformed(conn),
        };
        deliver(&outboxes, dispatches);
    }

    tracing::info!("Game task finished");
}

fn deliver(outboxes: &HashMap<ConnId, Outbox>, dispatches: Vec<Dispatch>) {
    for dispatch in dispatches {
        match dispatch {
            Dispatch::Broadcast(event) => {
                for outbox in outboxes.values() {
                    // A closed outbox means the socket is going away; its
                    // Disconnect is already queued behind us.
                    let _ = outbox.send(event.clone());
                }
            }
            Dispatch::Direct(conn, event) => {
                if let Some(outbox) = outboxes.get(&conn) {
                    let _ = outbox.send(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{MoveIntent, Side};

    async fn recv(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
        rx.recv().await.expect("outbox closed")
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let handle = GameHandle::spawn(Session::default());
        let (w_tx, mut w_rx) = mpsc::unbounded_channel();
        let (b_tx, mut b_rx) = mpsc::unbounded_channel();
        let (s_tx, mut s_rx) = mpsc::unbounded_channel();

        let white = handle.next_conn_id();
        let black = handle.next_conn_id();
        let spectator = handle.next_conn_id();
        handle.connect(white, w_tx);
        handle.connect(black, b_tx);
        handle.connect(spectator, s_tx);

        assert_eq!(recv(&mut w_rx).await, ServerEvent::PlayerRole(Side::White));
        let ServerEvent::SeatToken(token) = recv(&mut w_rx).await else {
            panic!("expected seat token");
        };
        assert!(matches!(recv(&mut w_rx).await, ServerEvent::BoardState(_)));

        assert_eq!(recv(&mut b_rx).await, ServerEvent::PlayerRole(Side::Black));
        assert_eq!(recv(&mut s_rx).await, ServerEvent::SpectatorRole);
        assert!(matches!(recv(&mut s_rx).await, ServerEvent::BoardState(_)));

        let intent = MoveIntent {
            from: "e2".into(),
            to: "e4".into(),
            promotion: None,
        };
        handle.submit_move(
            white,
            MoveRequest {
                intent: intent.clone(),
                token: Some(token),
            },
        );

        assert_eq!(recv(&mut s_rx).await, ServerEvent::Move(intent));
        assert_eq!(
            recv(&mut s_rx).await,
            ServerEvent::BoardState(
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1".to_string()
            )
        );
    }

    #[tokio::test]
    async fn disconnect_frees_the_seat() {
        let handle = GameHandle::spawn(Session::default());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        handle.connect(1, tx1);
        handle.disconnect(1);

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        handle.connect(2, tx2);
        assert_eq!(recv(&mut rx2).await, ServerEvent::PlayerRole(Side::White));
    }
}
