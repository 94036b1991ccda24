//! Per-monitor capture type

use image::RgbaImage;

use crate::domain::{DevicePixelRatio, Point, Rect};

/// One monitor's framebuffer with its place on the virtual desktop
#[derive(Clone, Debug)]
pub struct Capture {
    pub rgba: RgbaImage,
    /// Logical top-left in virtual-desktop space
    pub origin: Point,
    pub ratio: DevicePixelRatio,
}

impl Capture {
    pub fn new(rgba: RgbaImage, origin: Point, ratio: DevicePixelRatio) -> Self {
        log::debug!(
            "Capture at {:?}: {}x{} pixels @ {}",
            origin,
            rgba.width(),
            rgba.height(),
            ratio
        );
        Self {
            rgba,
            origin,
            ratio,
        }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Monitor geometry in logical units
    pub fn logical_rect(&self) -> Rect {
        let size = self.ratio.to_logical_size(self.width(), self.height());
        Rect::from_xywh(self.origin.x, self.origin.y, size.width, size.height)
    }
}
