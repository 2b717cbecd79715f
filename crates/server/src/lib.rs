pub mod config;
pub mod error;
pub mod hub;
pub mod registry;
pub mod routes;
pub mod session;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::hub::GameHandle;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub game: GameHandle,
}

/// Board page, game socket, and static assets for everything else.
pub fn app(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(routes::page::index))
        .route("/ws", get(routes::ws::ws_handler))
        .fallback_service(assets)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
