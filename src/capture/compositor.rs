//! Stitches per-monitor captures into one logical-space canvas

use std::borrow::Cow;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::CaptureError;
use super::image::Capture;
use crate::domain::{DevicePixelRatio, Point, Rect, Size};

/// The whole captured desktop in logical pixels
#[derive(Clone, Debug)]
pub struct Canvas {
    rgba: RgbaImage,
    /// Union of all monitor geometries on the virtual desktop
    bounds: Rect,
    /// The untouched capture when only one monitor was grabbed
    native: Option<Capture>,
}

impl Canvas {
    /// Wrap an already logical-space bitmap placed at `origin`
    pub fn from_rgba(rgba: RgbaImage, origin: Point) -> Self {
        let bounds = Rect::from_xywh(
            origin.x,
            origin.y,
            rgba.width() as i32,
            rgba.height() as i32,
        );
        Self {
            rgba,
            bounds,
            native: None,
        }
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Desktop-space geometry
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Canvas-local geometry; every interaction coordinate lives here
    pub fn local_bounds(&self) -> Rect {
        Rect::from_xywh(0, 0, self.bounds.width(), self.bounds.height())
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    /// Always 1.0: every monitor was resampled onto the logical grid
    pub fn ratio(&self) -> DevicePixelRatio {
        DevicePixelRatio::IDENTITY
    }

    pub fn native(&self) -> Option<&Capture> {
        self.native.as_ref()
    }

    /// Convert a virtual-desktop point into canvas-local coordinates
    pub fn to_local(&self, desktop: Point) -> Point {
        desktop - self.bounds.top_left()
    }
}

/// Combine monitor captures into one canvas at device-pixel-ratio 1.0
///
/// Each capture is scaled down by its own ratio and placed at
/// `origin - bounding origin`, so one canvas pixel is one logical unit on
/// every monitor.
pub fn compose(captures: Vec<Capture>) -> Result<Canvas, CaptureError> {
    let Some(bounds) = captures
        .iter()
        .map(Capture::logical_rect)
        .reduce(|acc, rect| acc.union(rect))
    else {
        return Err(CaptureError::unavailable("no monitors to capture"));
    };
    if !bounds.is_valid() {
        return Err(CaptureError::unavailable(format!(
            "desktop bounds {bounds:?} have no area"
        )));
    }
    let dims = bounds
        .dimensions()
        .ok_or_else(|| CaptureError::unavailable("desktop bounds have no area"))?;

    let mut rgba = RgbaImage::new(dims.width(), dims.height());
    for capture in &captures {
        let rect = capture.logical_rect();
        let Some(logical) = rect.dimensions() else {
            log::warn!("Skipping monitor at {:?} with empty geometry", capture.origin);
            continue;
        };
        let frame = if capture.rgba.dimensions() != (logical.width(), logical.height()) {
            Cow::Owned(imageops::resize(
                &capture.rgba,
                logical.width(),
                logical.height(),
                FilterType::Lanczos3,
            ))
        } else {
            Cow::Borrowed(&capture.rgba)
        };
        let x = i64::from(rect.left) - i64::from(bounds.left);
        let y = i64::from(rect.top) - i64::from(bounds.top);
        imageops::replace(&mut rgba, frame.as_ref(), x, y);
    }

    log::info!(
        "Composed {} monitor(s) into {}x{} canvas at {:?}",
        captures.len(),
        dims.width(),
        dims.height(),
        bounds.top_left()
    );

    let native = if captures.len() == 1 {
        captures.into_iter().next()
    } else {
        None
    };
    Ok(Canvas {
        rgba,
        bounds,
        native,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    fn ratio(r: f64) -> DevicePixelRatio {
        DevicePixelRatio::new(r).unwrap()
    }

    #[test]
    fn test_empty_monitor_list_is_unavailable() {
        let err = compose(Vec::new()).unwrap_err();
        assert!(matches!(
            &err,
            CaptureError::CaptureUnavailable { reason } if reason.contains("no monitors")
        ));
    }

    #[test]
    fn test_zero_area_desktop_is_unavailable() {
        let capture = Capture::new(RgbaImage::new(0, 10), Point::new(0, 0), ratio(1.0));
        assert!(matches!(
            compose(vec![capture]),
            Err(CaptureError::CaptureUnavailable { .. })
        ));
    }

    #[test]
    fn test_mixed_ratio_monitors_side_by_side() {
        let color = [40, 120, 200, 255];
        let left = Capture::new(solid(100, 50, color), Point::new(0, 0), ratio(1.0));
        // Same logical size, twice the pixels
        let right = Capture::new(solid(200, 100, color), Point::new(100, 0), ratio(2.0));
        let canvas = compose(vec![left, right]).unwrap();

        assert_eq!(canvas.size(), Size::new(200, 50));
        assert_eq!(canvas.ratio(), DevicePixelRatio::IDENTITY);
        assert!(canvas.native().is_none());

        for y in 0..50 {
            let a = canvas.rgba().get_pixel(99, y).0;
            let b = canvas.rgba().get_pixel(100, y).0;
            for c in 0..4 {
                assert!(
                    (a[c] as i16 - b[c] as i16).abs() <= 1,
                    "seam at row {y}: {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_negative_origins_are_translated() {
        let left = Capture::new(solid(10, 10, [255, 0, 0, 255]), Point::new(-10, 5), ratio(1.0));
        let right = Capture::new(solid(10, 10, [0, 255, 0, 255]), Point::new(0, 0), ratio(1.0));
        let canvas = compose(vec![left, right]).unwrap();

        assert_eq!(canvas.bounds(), Rect::new(-10, 0, 10, 15));
        assert_eq!(canvas.rgba().get_pixel(0, 5).0, [255, 0, 0, 255]);
        assert_eq!(canvas.rgba().get_pixel(10, 0).0, [0, 255, 0, 255]);
        // Gap not covered by any monitor stays transparent
        assert_eq!(canvas.rgba().get_pixel(0, 0).0[3], 0);
        assert_eq!(canvas.to_local(Point::new(-10, 5)), Point::new(0, 5));
    }

    #[test]
    fn test_single_monitor_keeps_native_capture() {
        let capture = Capture::new(solid(80, 40, [1, 2, 3, 255]), Point::new(0, 0), ratio(2.0));
        let canvas = compose(vec![capture]).unwrap();
        assert_eq!(canvas.size(), Size::new(40, 20));
        let native = canvas.native().unwrap();
        assert_eq!(native.ratio, ratio(2.0));
        assert_eq!(native.rgba.dimensions(), (80, 40));
    }
}
