use std::io::ErrorKind;

use axum::{extract::State, response::Html};

use crate::error::AppError;
use crate::AppState;

/// GET / — the board page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let path = state.config.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Ok(Html(body)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Board page missing at {}", path.display());
            Err(AppError::NotFound("Board page not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
