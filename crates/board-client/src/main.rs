//! Terminal board client.
//!
//! Usage: `board-client [ws-url]`. Type moves as `e2 e4` (or `e2e4`); each
//! line is treated as dragging the piece on the first square to the second.

use std::env;

use anyhow::{Context, Result};
use board_client::{BoardRenderer, Notice};
use chess_core::{ClientEvent, GameOver, PlayerRole, ServerEvent};
use futures::{SinkExt, StreamExt};
use shakmaty::Square;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let url = env::args()
        .nth(1)
        .or_else(|| env::var("CHESS_SERVER_URL").ok())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let (socket, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;
    tracing::info!("Connected to {url}");
    let (mut sink, mut stream) = socket.split();

    let mut renderer = BoardRenderer::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            frame = stream.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(t))) => t.to_string(),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e).context("WebSocket error"),
                };
                let Some((event, rendered)) = renderer.apply_frame(&text) else {
                    continue;
                };
                if rendered {
                    print!("{}", renderer.grid());
                }
                report(&renderer, &event);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let Some((from, to)) = parse_squares(&line) else {
                    println!("Enter a move like `e2 e4`");
                    continue;
                };
                match drag(&mut renderer, from, to) {
                    Some(request) => {
                        let json = serde_json::to_string(&ClientEvent::Move(request))?;
                        sink.send(Message::Text(json.into())).await?;
                    }
                    None => println!("Can't move {from} to {to}"),
                }
            }
        }
    }

    Ok(())
}

fn drag(
    renderer: &mut BoardRenderer,
    from: Square,
    to: Square,
) -> Option<chess_core::MoveRequest> {
    let (fr, fc) = renderer.grid().locate(from)?;
    let (tr, tc) = renderer.grid().locate(to)?;
    if !renderer.drag_start(fr, fc) {
        return None;
    }
    renderer.drop_on(tr, tc)
}

fn parse_squares(line: &str) -> Option<(Square, Square)> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let from = compact.get(0..2)?.parse().ok()?;
    let to = compact.get(2..4)?.parse().ok()?;
    Some((from, to))
}

fn report(renderer: &BoardRenderer, event: &ServerEvent) {
    match event {
        ServerEvent::PlayerRole(side) => println!("You play {}", side.as_char()),
        ServerEvent::SpectatorRole => println!("You are watching"),
        _ => {}
    }
    if !matches!(event, ServerEvent::GameOver(_) | ServerEvent::MoveError(_)) {
        return;
    }
    match renderer.notice() {
        Some(Notice::GameOver(GameOver::Checkmate { winner })) => {
            let you = renderer.role().and_then(PlayerRole::side);
            let verdict = if you == Some(*winner) { " You win." } else { "" };
            println!("Checkmate, {} wins.{verdict}", winner.as_char());
        }
        Some(Notice::GameOver(GameOver::Draw { reason })) => println!("Draw ({reason:?})"),
        Some(Notice::MoveError(msg)) => println!("{msg}"),
        None => {}
    }
}
