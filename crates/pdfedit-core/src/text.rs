use std::fmt;

use crate::color::Color;
use crate::font::FontInfo;
use crate::geometry::{BBox, Point};

/// A run of text drawn by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSpan {
    /// Decoded text of the run.
    pub text: String,
    /// Bounding box in top-left origin coordinates.
    pub bbox: BBox,
    /// Raw font name as it appears in the document (`/BaseFont`).
    pub font_name: String,
    /// Effective font size in points.
    pub size: f64,
    /// Fill color.
    pub color: Color,
    /// Start of the baseline, in top-left origin coordinates.
    pub origin: Point,
}

impl TextSpan {
    /// Build a span whose baseline sits at 80% of the box height.
    pub fn new(text: impl Into<String>, bbox: BBox, font_name: impl Into<String>, size: f64) -> Self {
        let origin = Point::new(bbox.x0, bbox.top + bbox.height() * 0.8);
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            size,
            color: Color::black(),
            origin,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Whitespace-only spans carry geometry but no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The same span moved down by `dy` points.
    pub fn shifted(&self, dy: f64) -> TextSpan {
        TextSpan {
            bbox: self.bbox.translate(0.0, dy),
            origin: Point::new(self.origin.x, self.origin.y + dy),
            ..self.clone()
        }
    }
}

/// Horizontal placement of a line on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        })
    }
}

/// A visual line reconstructed from spans sharing a baseline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Union of the member span boxes.
    pub bbox: BBox,
    /// Member texts in reading order.
    pub text: String,
    /// Font of the first non-blank span.
    pub font: FontInfo,
    pub alignment: Alignment,
    /// Baseline of the first non-blank span.
    pub baseline_y: f64,
    /// Member spans, left to right.
    pub spans: Vec<TextSpan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_span_places_baseline_inside_box() {
        let span = TextSpan::new("Hello", BBox::new(72.0, 100.0, 100.0, 112.0), "Helvetica", 12.0);
        assert!((span.origin.y - 109.6).abs() < 1e-9);
        assert_eq!(span.origin.x, 72.0);
        assert_eq!(span.color, Color::black());
    }

    #[test]
    fn blank_span_detection() {
        let bbox = BBox::new(0.0, 0.0, 5.0, 10.0);
        assert!(TextSpan::new("  ", bbox, "F", 10.0).is_blank());
        assert!(TextSpan::new("", bbox, "F", 10.0).is_blank());
        assert!(!TextSpan::new(" a ", bbox, "F", 10.0).is_blank());
    }

    #[test]
    fn shifted_moves_box_and_baseline() {
        let span = TextSpan::new("x", BBox::new(0.0, 10.0, 5.0, 20.0), "F", 10.0)
            .with_origin(Point::new(0.0, 18.0));
        let moved = span.shifted(41.8);
        assert_eq!(moved.bbox.top, 51.8);
        assert_eq!(moved.origin.y, 18.0 + 41.8);
        assert_eq!(moved.text, "x");
    }

    #[test]
    fn alignment_display() {
        assert_eq!(Alignment::Center.to_string(), "center");
        assert_eq!(Alignment::default(), Alignment::Left);
    }
}
