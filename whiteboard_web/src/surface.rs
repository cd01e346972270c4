//! Mirrors a [`Board`] onto an HTML canvas.

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, ImageData, Url};
use whiteboard_canvas::{Board, DirtyRect, Segment};

pub struct Surface {
    board: Board,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    /// Sizes the canvas with id `id` to its layout box and backs it with a fresh board.
    pub fn attach(id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.get_element_by_id(id)?.dyn_into().ok()?;

        let width = canvas.offset_width().max(1) as u32;
        let height = canvas.offset_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let board = match Board::new(width, height) {
            Ok(board) => board,
            Err(e) => {
                log::error!("Failed to create board: {}", e);
                return None;
            }
        };
        Some(Self { board, ctx })
    }

    /// Draws a segment, local or relayed. Malformed segments are logged and skipped.
    pub fn draw(&mut self, segment: &Segment) {
        match self.board.draw_segment(segment) {
            Ok(Some(rect)) => self.blit(rect),
            Ok(None) => {}
            Err(e) => log::warn!("Skipping segment: {}", e),
        }
    }

    fn blit(&self, rect: DirtyRect) {
        let rgba = self.board.rgba_region(rect);
        let result = ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba.as_slice()), rect.width, rect.height)
            .and_then(|image| self.ctx.put_image_data(&image, rect.x as f64, rect.y as f64));
        if let Err(e) = result {
            log::error!("Failed to blit board region: {:?}", e);
        }
    }

    pub fn clear(&mut self) {
        self.board.clear();
        let all = self.board.full_rect();
        self.ctx.clear_rect(
            all.x as f64,
            all.y as f64,
            all.width as f64,
            all.height as f64,
        );
    }

    /// Encodes the board as PNG and hands it to the browser as a download.
    pub fn save(&self, file_name: &str) {
        let png = match self.board.export_png() {
            Ok(png) => png,
            Err(e) => {
                log::error!("Export failed: {}", e);
                return;
            }
        };
        if let Err(e) = download(&png, "image/png", file_name) {
            log::error!("Download failed: {:?}", e);
        }
    }
}

fn download(bytes: &[u8], mime: &str, file_name: &str) -> Result<(), JsValue> {
    // Create a blob from the bytes
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    // Create a temporary URL for the blob
    let url = Url::create_object_url_with_blob(&blob)?;

    // Create an anchor element to trigger the download
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    // Clean up the temporary URL
    Url::revoke_object_url(&url)
}
