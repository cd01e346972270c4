use futures_util::StreamExt;
use std::path::Path;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};
use whiteboard_canvas::{Board, CanvasError, WsMessage};

use crate::error::CliError;

/// Renders relayed segments onto a local board.
pub struct Recorder {
    board: Board,
    drawn: usize,
    skipped: usize,
}

impl Recorder {
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Ok(Self {
            board: Board::new(width, height)?,
            drawn: 0,
            skipped: 0,
        })
    }

    /// Draws one text frame. Malformed frames are logged and skipped.
    pub fn apply_text(&mut self, text: &str) {
        let result = WsMessage::from_json(text).and_then(|WsMessage::Draw(segment)| {
            self.board.draw_segment(&segment)
        });
        match result {
            Ok(_) => self.drawn += 1,
            Err(e) => {
                warn!("Skipping frame: {}", e);
                self.skipped += 1;
            }
        }
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

/// Records the board until Ctrl-C or until the server goes away, then writes
/// it to `out` as PNG.
pub async fn run(ws_url: &str, out: &Path, width: u32, height: u32) -> Result<Recorder, CliError> {
    let mut recorder = Recorder::new(width, height)?;
    let (mut ws, _) = connect_async(ws_url).await?;
    info!("Watching {} (Ctrl-C to save and exit)", ws_url);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => recorder.apply_text(&text),
                Some(Ok(Message::Close(_))) | None => {
                    info!("Server closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Connection lost: {}", e);
                    break;
                }
            },
            _ = &mut ctrl_c => break,
        }
    }

    tokio::fs::write(out, recorder.board().export_png()?).await?;
    Ok(recorder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::SinkExt;
    use tokio::net::TcpListener;

    const RED_LINE: &str =
        r##"{"draw":{"x0":0,"y0":0,"x1":10,"y1":10,"color":"#ff0000","brushSize":4}}"##;

    #[tokio::test]
    async fn saves_the_board_when_the_server_closes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.send(Message::Text(RED_LINE.into())).await.unwrap();
            ws.close(None).await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("board.png");
        let recorder = run(&format!("ws://{addr}/ws"), &out, 32, 32).await.unwrap();

        assert_eq!(recorder.drawn(), 1);
        assert_eq!(recorder.skipped(), 0);
        let pixel = recorder.board().pixel(5, 5).unwrap();
        assert_eq!((pixel.r, pixel.g, pixel.b, pixel.a), (255, 0, 0, 255));

        let written = tokio::fs::read(&out).await.unwrap();
        assert_eq!(&written[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(written, recorder.board().export_png().unwrap());
    }

    #[test]
    fn draws_valid_frames_and_skips_the_rest() {
        let mut recorder = Recorder::new(32, 32).unwrap();

        recorder.apply_text(RED_LINE);
        recorder.apply_text("garbage");
        recorder.apply_text(
            r#"{"draw":{"x0":0,"y0":0,"x1":1,"y1":1,"color":"blurple","brushSize":4}}"#,
        );

        assert_eq!(recorder.drawn(), 1);
        assert_eq!(recorder.skipped(), 2);
        let pixel = recorder.board().pixel(5, 5).unwrap();
        assert_eq!((pixel.r, pixel.g, pixel.b, pixel.a), (255, 0, 0, 255));
    }
}
