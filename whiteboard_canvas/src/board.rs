//! The persistent render surface.
//!
//! Local and relayed segments both go through [`Board::draw_segment`], so a
//! segment renders to the same pixels regardless of where it came from.

use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::{CanvasError, Color, Segment};

/// The region of the board touched by a draw call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRect {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

#[derive(Clone)]
pub struct Board {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Board {
    /// Creates a transparent board. Either dimension being zero is an error.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Pixmap::new(width, height)
            .map(|pixmap| Self { pixmap })
            .ok_or(CanvasError::InvalidSize { width, height })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn full_rect(&self) -> DirtyRect {
        DirtyRect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Strokes `segment` with round caps and joins.
    ///
    /// Returns the touched region, or `None` when the segment lies entirely
    /// off the board. Malformed segments are rejected before any pixel is
    /// modified.
    pub fn draw_segment(&mut self, segment: &Segment) -> Result<Option<DirtyRect>, CanvasError> {
        let color: Color = segment.color.parse()?;
        // The rasterizer works in f32; anything that does not survive the
        // narrowing would draw nothing.
        let size = segment.brush_size;
        if !(size as f32).is_finite() || size <= 0.0 {
            return Err(CanvasError::InvalidBrushSize(size));
        }
        let coords = [segment.x0, segment.y0, segment.x1, segment.y1];
        if let Some(&bad) = coords.iter().find(|v| !(**v as f32).is_finite()) {
            return Err(CanvasError::CoordinateOutOfRange(bad));
        }

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.anti_alias = true;

        let (x0, y0) = (segment.x0 as f32, segment.y0 as f32);
        let (x1, y1) = (segment.x1 as f32, segment.y1 as f32);
        let width = size as f32;

        if segment.is_dot() {
            // A zero-length round-capped line is a disc.
            if let Some(path) = PathBuilder::from_circle(x0, y0, width / 2.0) {
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        } else {
            let mut pb = PathBuilder::new();
            pb.move_to(x0, y0);
            pb.line_to(x1, y1);
            if let Some(path) = pb.finish() {
                let stroke = Stroke {
                    width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        Ok(self.dirty_rect(segment))
    }

    /// Bounds of the segment padded by half the brush plus one pixel of
    /// anti-aliasing, clamped to the board.
    fn dirty_rect(&self, segment: &Segment) -> Option<DirtyRect> {
        let pad = segment.brush_size / 2.0 + 1.0;
        let clamp_x = |v: f64| v.clamp(0.0, self.width() as f64);
        let clamp_y = |v: f64| v.clamp(0.0, self.height() as f64);

        let left = clamp_x((segment.x0.min(segment.x1) - pad).floor());
        let right = clamp_x((segment.x0.max(segment.x1) + pad).ceil());
        let top = clamp_y((segment.y0.min(segment.y1) - pad).floor());
        let bottom = clamp_y((segment.y0.max(segment.y1) + pad).ceil());

        if right <= left || bottom <= top {
            return None;
        }
        Some(DirtyRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }

    /// Erases every stroke. There is no history to restore from.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// The straight-alpha color at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color {
                r: c.red(),
                g: c.green(),
                b: c.blue(),
                a: c.alpha(),
            }
        })
    }

    /// Premultiplied RGBA bytes of the whole surface, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA bytes for `rect`, row-major. This is the layout
    /// browser `ImageData` expects.
    pub fn rgba_region(&self, rect: DirtyRect) -> Vec<u8> {
        let mut out = Vec::with_capacity(rect.width as usize * rect.height as usize * 4);
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let c = self.pixel(x, y).unwrap_or(Color { r: 0, g: 0, b: 0, a: 0 });
                out.extend_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        out
    }

    /// Encodes the current surface as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, CanvasError> {
        self.pixmap
            .encode_png()
            .map_err(|e| CanvasError::Encode(e.to_string()))
    }
}
