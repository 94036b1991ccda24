//! Export projection
//!
//! Maps the logical selection onto device pixels of the chosen source bitmap
//! and flattens base and annotations into the final image.

pub mod sink;

use std::borrow::Cow;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::capture::Canvas;
use crate::domain::{DevicePixelRatio, Rect, Size};

pub use sink::{ExportError, ExportSink, FileSink, ImageFormat, default_save_path, unique_file_path};

/// Which bitmap the export is cut from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportTarget {
    /// The composed logical-space canvas (ratio 1.0)
    #[default]
    Canvas,
    /// The untouched single-monitor capture at its own ratio
    Native,
}

/// The flattened result handed to sinks
#[derive(Debug, Clone)]
pub struct Export {
    pub image: RgbaImage,
    /// Device-space rectangle the image was cut from
    pub crop: Rect,
}

/// Device-space crop for `selection`
///
/// An invalid selection, or one that misses the bitmap entirely, selects the
/// full bitmap.
pub fn device_crop(selection: Rect, ratio: DevicePixelRatio, full: Size) -> Rect {
    let full = Rect::from_xywh(0, 0, full.width, full.height);
    if !selection.is_valid() {
        return full;
    }
    ratio
        .to_device_rect(selection.normalized())
        .intersect(full)
        .unwrap_or(full)
}

/// Copy `crop` out of `base` and composite the same region of `layer` on top
pub fn flatten(base: &RgbaImage, layer: &RgbaImage, crop: Rect) -> RgbaImage {
    let Some(dims) = crop.dimensions() else {
        return RgbaImage::new(0, 0);
    };
    let (x, y) = (crop.left.max(0) as u32, crop.top.max(0) as u32);
    let mut out = imageops::crop_imm(base, x, y, dims.width(), dims.height()).to_image();
    let overlay = imageops::crop_imm(layer, x, y, dims.width(), dims.height()).to_image();
    imageops::overlay(&mut out, &overlay, 0, 0);
    out
}

/// Produce the exported bitmap for the current session state
pub fn project(canvas: &Canvas, layer: &RgbaImage, selection: Rect, target: ExportTarget) -> Export {
    let (base, ratio) = match (target, canvas.native()) {
        (ExportTarget::Native, Some(native)) => (&native.rgba, native.ratio),
        (ExportTarget::Native, None) => {
            log::warn!("Native export needs a single monitor, using the composed canvas");
            (canvas.rgba(), canvas.ratio())
        }
        (ExportTarget::Canvas, _) => (canvas.rgba(), canvas.ratio()),
    };

    let layer = if layer.dimensions() != base.dimensions() {
        Cow::Owned(imageops::resize(
            layer,
            base.width(),
            base.height(),
            FilterType::Lanczos3,
        ))
    } else {
        Cow::Borrowed(layer)
    };

    let full = Size::new(base.width() as i32, base.height() as i32);
    let crop = device_crop(selection, ratio, full);
    log::info!("Exporting {crop:?} at {ratio} from {}x{}", full.width, full.height);
    Export {
        image: flatten(base, &layer, crop),
        crop,
    }
}
