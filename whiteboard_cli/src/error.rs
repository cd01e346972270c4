use thiserror::Error;
use whiteboard_canvas::CanvasError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid server URL {0:?}: expected http(s):// or ws(s)://")]
    InvalidServerUrl(String),

    #[error("could not reach the server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
