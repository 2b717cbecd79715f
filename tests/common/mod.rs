#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use chess_core::{ClientEvent, MoveIntent, MoveRequest, ServerEvent};
use futures::{SinkExt, StreamExt};
use server::config::Config;
use server::hub::GameHandle;
use server::session::Session;
use server::AppState;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a server with a fresh game on an ephemeral port.
pub async fn spawn_server(session: Session) -> SocketAddr {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
    };
    let app = server::app(AppState {
        config,
        game: GameHandle::spawn(session),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Build a URL for a path on the test server.
pub fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

/// A connected player and the events it received on joining.
pub struct Player {
    pub socket: Socket,
    pub token: Option<String>,
}

pub async fn join(addr: SocketAddr) -> (Player, Vec<ServerEvent>) {
    let (socket, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("Failed to connect");
    let mut player = Player {
        socket,
        token: None,
    };

    // Role, optional seat token, then the board.
    let mut greeting = Vec::new();
    loop {
        let ev = player.next().await;
        if let ServerEvent::SeatToken(t) = &ev {
            player.token = Some(t.clone());
        }
        let done = matches!(ev, ServerEvent::BoardState(_));
        greeting.push(ev);
        if done {
            break;
        }
    }
    (player, greeting)
}

impl Player {
    pub async fn next(&mut self) -> ServerEvent {
        loop {
            match self.socket.next().await {
                Some(Ok(Message::Text(t))) => {
                    return serde_json::from_str(&t.to_string()).expect("Bad server frame")
                }
                Some(Ok(_)) => continue,
                other => panic!("Socket ended: {other:?}"),
            }
        }
    }

    pub async fn send_move(&mut self, uci: &str) {
        let request = MoveRequest {
            intent: intent(uci),
            token: self.token.clone(),
        };
        self.send_raw(&serde_json::to_string(&ClientEvent::Move(request)).unwrap())
            .await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.socket
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send");
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

pub fn intent(uci: &str) -> MoveIntent {
    MoveIntent {
        from: uci[0..2].to_string(),
        to: uci[2..4].to_string(),
        promotion: Some("q".to_string()),
    }
}
