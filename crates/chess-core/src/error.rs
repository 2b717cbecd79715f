#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Illegal position: {0}")]
    IllegalPosition(String),
}
