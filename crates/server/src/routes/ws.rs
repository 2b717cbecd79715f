//! Game WebSocket: one JSON event per text frame in each direction.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chess_core::{ClientEvent, ServerEvent};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::hub::GameHandle;
use crate::registry::ConnId;
use crate::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.game))
}

async fn handle_socket(socket: WebSocket, game: GameHandle) {
    let conn = game.next_conn_id();
    tracing::info!(conn, "New connection");

    let (mut sender, mut receiver) = socket.split();
    let (outbox, mut inbox) = mpsc::unbounded_channel::<ServerEvent>();
    game.connect(conn, outbox);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = inbox.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(conn, "Failed to encode event: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let reader = game.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(t) => dispatch_frame(&reader, conn, &t.to_string()),
                Message::Close(_) => break,
                _ => continue,
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!(conn, "Connection closed");
    game.disconnect(conn);
}

fn dispatch_frame(game: &GameHandle, conn: ConnId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Move(request)) => game.submit_move(conn, request),
        Err(e) => {
            tracing::warn!(conn, "Invalid message: {e}");
            game.malformed(conn);
        }
    }
}
