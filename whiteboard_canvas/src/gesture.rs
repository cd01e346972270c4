//! Pointer gesture sampling.
//!
//! A drag becomes one dot segment on press followed by one segment per
//! movement sample, each joining the previous sample to the current one.

use crate::{Brush, Point, Segment};

#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    last: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.last.is_some()
    }

    /// Starts a stroke at `at` and returns its initial dot.
    pub fn press(&mut self, at: Point, brush: &Brush) -> Segment {
        self.last = Some(at);
        Segment::dot(at, brush)
    }

    /// Extends the current stroke to `to`. Returns `None` when no button is held.
    pub fn move_to(&mut self, to: Point, brush: &Brush) -> Option<Segment> {
        let from = self.last?;
        self.last = Some(to);
        Some(Segment::between(from, to, brush))
    }

    /// Ends the stroke (pointer released or left the surface).
    pub fn release(&mut self) {
        self.last = None;
    }
}
