use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("invalid brush size {0}")]
    InvalidBrushSize(f64),

    #[error("segment coordinate {0} is not drawable")]
    CoordinateOutOfRange(f64),

    #[error("surface size {width}x{height} is not drawable")]
    InvalidSize { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
}
