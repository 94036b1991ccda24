//! Conversions between logical (UI) and device (source bitmap) coordinates
//!
//! Every `× ratio` in the crate goes through [`DevicePixelRatio`]; no other
//! module scales coordinates by hand.

use std::fmt;

use super::geometry::{Point, Rect, Size};

/// Physical pixels per logical unit for one capture
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct DevicePixelRatio(f64);

impl DevicePixelRatio {
    /// One device pixel per logical unit; the ratio of every composed canvas
    pub const IDENTITY: Self = Self(1.0);

    /// Returns `None` for zero, negative or non-finite ratios
    pub fn new(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn to_device_point(self, p: Point) -> Point {
        Point::new(self.scale(p.x), self.scale(p.y))
    }

    pub fn to_device_size(self, s: Size) -> Size {
        Size::new(self.scale(s.width), self.scale(s.height))
    }

    /// `round(topLeft × r)` sized `round(size × r)`
    ///
    /// Origin and size are rounded independently, so a rect's device width does
    /// not depend on where it sits.
    pub fn to_device_rect(self, r: Rect) -> Rect {
        let top_left = self.to_device_point(r.top_left());
        let size = self.to_device_size(r.size());
        Rect::from_xywh(top_left.x, top_left.y, size.width, size.height)
    }

    pub fn to_logical_point(self, p: Point) -> Point {
        Point::new(self.unscale(p.x), self.unscale(p.y))
    }

    /// Logical size covered by a bitmap of `width × height` device pixels
    pub fn to_logical_size(self, width: u32, height: u32) -> Size {
        Size::new(
            (width as f64 / self.0).round() as i32,
            (height as f64 / self.0).round() as i32,
        )
    }

    fn scale(self, v: i32) -> i32 {
        (v as f64 * self.0).round() as i32
    }

    fn unscale(self, v: i32) -> i32 {
        (v as f64 / self.0).round() as i32
    }
}

impl Default for DevicePixelRatio {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for DevicePixelRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_ratio() {
        assert!(DevicePixelRatio::new(0.0).is_none());
        assert!(DevicePixelRatio::new(-1.5).is_none());
        assert!(DevicePixelRatio::new(f64::NAN).is_none());
        assert!(DevicePixelRatio::new(1.25).is_some());
    }

    #[test]
    fn test_device_rect_doubles_at_ratio_two() {
        let r = DevicePixelRatio::new(2.0).unwrap();
        let device = r.to_device_rect(Rect::from_xywh(10, 20, 30, 40));
        assert_eq!(device, Rect::from_xywh(20, 40, 60, 80));
    }

    #[test]
    fn test_fractional_ratio_rounds_origin_and_size_separately() {
        let r = DevicePixelRatio::new(1.5).unwrap();
        let device = r.to_device_rect(Rect::from_xywh(1, 1, 3, 3));
        // 1.5 -> 2, 4.5 -> 5 (round half away from zero)
        assert_eq!(device, Rect::from_xywh(2, 2, 5, 5));
    }

    #[test]
    fn test_logical_size_of_hidpi_bitmap() {
        let r = DevicePixelRatio::new(2.0).unwrap();
        assert_eq!(r.to_logical_size(3840, 2160), Size::new(1920, 1080));
        assert_eq!(
            r.to_logical_point(Point::new(200, 100)),
            Point::new(100, 50)
        );
    }
}
