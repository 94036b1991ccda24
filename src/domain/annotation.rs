//! Drawing tool and style types
//!
//! Shape geometry is stored in canvas logical coordinates.

use super::geometry::Point;
use crate::config::StrokeColor;

/// Active drawing tool; `None` means pointer input drives the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    None,
    Pen,
    Text,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::None,
        Tool::Pen,
        Tool::Text,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Line,
        Tool::Arrow,
    ];

    /// Tools whose stroke width the wheel adjusts
    pub fn uses_stroke_width(self) -> bool {
        !matches!(self, Tool::None | Tool::Text)
    }
}

/// Parametric shape drawn by the shape tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

/// Color and width for strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: StrokeColor,
    width: u32,
}

impl StrokeStyle {
    pub const MIN_WIDTH: u32 = 1;
    pub const MAX_WIDTH: u32 = 20;

    pub fn new(color: StrokeColor, width: u32) -> Self {
        Self {
            color,
            width: width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Add `delta` to the width, clamped to [1, 20]
    pub fn adjust_width(&mut self, delta: i32) {
        let width = (self.width as i64 + delta as i64)
            .clamp(Self::MIN_WIDTH as i64, Self::MAX_WIDTH as i64);
        self.width = width as u32;
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(StrokeColor::default(), 5)
    }
}

/// Color and point size for text regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: StrokeColor,
    size: f32,
}

impl TextStyle {
    pub fn new(color: StrokeColor, size: f32) -> Self {
        Self {
            color,
            size: if size > 0.0 { size } else { 16.0 },
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Add `delta` points; ignored when the result would not be positive
    pub fn adjust_size(&mut self, delta: i32) -> bool {
        let size = self.size + delta as f32;
        if size > 0.0 {
            self.size = size;
            true
        } else {
            false
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(StrokeColor::default(), 16.0)
    }
}

/// A shape being dragged out but not yet committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePreview {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_width_clamps() {
        let mut style = StrokeStyle::new(StrokeColor::RED, 50);
        assert_eq!(style.width(), 20);
        style.adjust_width(3);
        assert_eq!(style.width(), 20);
        style.adjust_width(-100);
        assert_eq!(style.width(), 1);
        style.adjust_width(4);
        assert_eq!(style.width(), 5);
    }

    #[test]
    fn test_font_size_stays_positive() {
        let mut style = TextStyle::new(StrokeColor::BLACK, 3.0);
        assert!(style.adjust_size(-2));
        assert_eq!(style.size(), 1.0);
        assert!(!style.adjust_size(-1));
        assert_eq!(style.size(), 1.0);
        assert!(style.adjust_size(30));
        assert_eq!(style.size(), 31.0);
    }

    #[test]
    fn test_tools_using_stroke_width() {
        assert!(Tool::Pen.uses_stroke_width());
        assert!(!Tool::Text.uses_stroke_width());
        assert!(!Tool::None.uses_stroke_width());
    }
}
