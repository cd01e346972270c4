//! Drawing primitives shared by the whiteboard clients.
//!
//! `protocol` holds the wire types relayed by the server, `brush` and
//! `gesture` turn pointer input into segments, and `board` (behind the
//! `raster` feature) is the pixel surface every client renders into.

#[cfg(feature = "raster")]
pub mod board;
pub mod brush;
pub mod error;
pub mod gesture;
pub mod protocol;

#[cfg(feature = "raster")]
pub use board::{Board, DirtyRect};
pub use brush::{Brush, Color};
pub use error::CanvasError;
pub use gesture::PointerTracker;
pub use protocol::{Point, Segment, WsMessage};

/// File name the clients use when exporting the board.
pub const EXPORT_FILE_NAME: &str = "whiteboard-drawing.png";
