use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Cannot connect to server. Make sure the backend is running and the API URL is correct.")]
    Unreachable,

    #[error("{0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(String),
}
