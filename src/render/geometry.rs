//! Shared geometry calculations for annotations
//!
//! This module contains constants and math shared between
//! overlay rendering and committed drawing.

/// Arrow geometry constants
pub mod arrow {
    /// Arrowhead length per unit of stroke width
    pub const HEAD_LENGTH_FACTOR: f32 = 5.0;
    /// Arrowhead half-angle from the shaft in radians (12 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::PI / 15.0;

    /// Calculate the two base vertices of the arrowhead
    ///
    /// The head is an isosceles triangle with its apex at `end`; the shaft
    /// angle is measured from `end` back towards `start`.
    pub fn head_points(start: (f32, f32), end: (f32, f32), stroke_width: f32) -> [(f32, f32); 2] {
        let angle = (start.1 - end.1).atan2(start.0 - end.0);
        let length = stroke_width * HEAD_LENGTH_FACTOR;

        let vertex = |a: f32| (end.0 + a.cos() * length, end.1 + a.sin() * length);
        [vertex(angle + HEAD_ANGLE), vertex(angle - HEAD_ANGLE)]
    }
}

/// Shape (rectangle/ellipse) geometry constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
}

/// Selection chrome drawn by the overlay
pub mod selection {
    use crate::config::StrokeColor;

    /// Side of the square hit zone centered on each handle anchor
    pub const HANDLE_HIT_SIZE: i32 = 20;
    /// Side of the drawn handle square
    pub const HANDLE_DRAW_SIZE: f32 = 6.0;
    pub const OUTLINE_WIDTH: f32 = 2.0;
    /// Dash pattern of the selection outline (on, off)
    pub const OUTLINE_DASH: [f32; 2] = [6.0, 4.0];
    pub const OUTLINE_COLOR: StrokeColor = StrokeColor::RED;
    /// Width of the brush-size indicator ring
    pub const INDICATOR_WIDTH: f32 = 2.0;
}

/// Text region layout constants
pub mod text {
    /// Inner margin between the region anchor and the first glyph
    pub const CONTENT_MARGIN: f32 = 4.0;
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Calculate ellipse center and radii from bounding box
#[inline]
pub fn ellipse_from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (f32, f32, f32, f32) {
    let cx = (min_x + max_x) * 0.5;
    let cy = (min_y + max_y) * 0.5;
    let rx = ((max_x - min_x) * 0.5).max(1.0);
    let ry = ((max_y - min_y) * 0.5).max(1.0);
    (cx, cy, rx, ry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn test_arrow_head_for_horizontal_shaft() {
        let [p1, p2] = arrow::head_points((0.0, 0.0), (100.0, 0.0), 5.0);
        let dx = 25.0 * (PI / 15.0).cos();
        let dy = 25.0 * (PI / 15.0).sin();
        // Shaft angle is PI, so both vertices trail behind the tip
        assert!(close(p1, (100.0 - dx, -dy)), "{p1:?}");
        assert!(close(p2, (100.0 - dx, dy)), "{p2:?}");
    }

    #[test]
    fn test_arrow_head_scales_with_width() {
        let [p1, _] = arrow::head_points((0.0, 0.0), (0.0, 100.0), 2.0);
        let dist = ((p1.0).powi(2) + (p1.1 - 100.0).powi(2)).sqrt();
        assert!((dist - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_ellipse_from_bounds() {
        let (cx, cy, rx, ry) = ellipse_from_bounds(0.0, 0.0, 10.0, 4.0);
        assert_eq!((cx, cy, rx, ry), (5.0, 2.0, 5.0, 2.0));
        let (_, _, rx, _) = ellipse_from_bounds(3.0, 3.0, 3.0, 9.0);
        assert_eq!(rx, 1.0);
    }
}
