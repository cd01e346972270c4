use serde::{Deserialize, Serialize};

use crate::{Brush, CanvasError};

/// A position on the canvas, in canvas-local pixels.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// Data structure for a single line-draw instruction.
// This is what clients send and the server relays verbatim.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub brush_size: f64,
}

impl Segment {
    /// A segment from `from` to `to` in the given brush.
    pub fn between(from: Point, to: Point, brush: &Brush) -> Self {
        Self {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            color: brush.color.clone(),
            brush_size: brush.size,
        }
    }

    /// A zero-length segment, emitted when a stroke starts.
    pub fn dot(at: Point, brush: &Brush) -> Self {
        Self::between(at, at, brush)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn is_dot(&self) -> bool {
        self.x0 == self.x1 && self.y0 == self.y1
    }
}

// Message format for WebSocket communication.
// `draw` is the only event; it serializes as `{"draw":{...}}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub enum WsMessage {
    #[serde(rename = "draw")]
    Draw(Segment),
}

impl WsMessage {
    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_event_uses_wire_field_names() {
        let msg = WsMessage::Draw(Segment {
            x0: 0.0,
            y0: 0.0,
            x1: 10.0,
            y1: 10.0,
            color: "#ff0000".to_string(),
            brush_size: 4.0,
        });

        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        let payload = &value["draw"];
        assert_eq!(payload["x1"], 10.0);
        assert_eq!(payload["color"], "#ff0000");
        assert_eq!(payload["brushSize"], 4.0);
        assert!(payload.get("brush_size").is_none());
    }

    #[test]
    fn parses_integer_coordinates() {
        let text = r##"{"draw":{"x0":0,"y0":0,"x1":10,"y1":10,"color":"#ff0000","brushSize":4}}"##;
        let WsMessage::Draw(segment) = WsMessage::from_json(text).unwrap();
        assert_eq!(segment.end(), Point::new(10.0, 10.0));
        assert_eq!(segment.brush_size, 4.0);
        assert!(!segment.is_dot());
    }

    #[test]
    fn rejects_unknown_events() {
        let err = WsMessage::from_json(r#"{"erase":{}}"#).unwrap_err();
        assert!(matches!(err, CanvasError::Json(_)));
    }

    #[test]
    fn dot_starts_and_ends_at_the_same_point() {
        let brush = Brush::default();
        let dot = Segment::dot(Point::new(3.0, 4.0), &brush);
        assert!(dot.is_dot());
        assert_eq!(dot.start(), dot.end());
        assert_eq!(dot.color, "#000000");
        assert_eq!(dot.brush_size, 2.0);
    }
}
