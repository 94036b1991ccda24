//! Desktop capture module
//!
//! This module consolidates:
//! - Per-monitor capture type (image.rs)
//! - Monitor stitching into one canvas (compositor.rs)
//! - Capture sources (source.rs)

pub mod compositor;
pub mod image;
pub mod source;

use std::path::PathBuf;

pub use compositor::{Canvas, compose};
pub use image::Capture;
pub use source::{CaptureSource, ImageFileSource, MonitorSpec, StaticSource};

/// Why no canvas could be produced
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No monitors, or monitors covering no area; fatal to starting a session
    #[error("capture unavailable: {reason}")]
    CaptureUnavailable { reason: String },
    #[error("failed to load monitor image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },
    #[error("invalid monitor spec `{0}`, expected path[@x,y[@ratio]]")]
    InvalidSpec(String),
}

impl CaptureError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::CaptureUnavailable {
            reason: reason.into(),
        }
    }
}

/// Pull captures from `source` and stitch them into a canvas
pub fn capture_desktop(source: &mut dyn CaptureSource) -> Result<Canvas, CaptureError> {
    let captures = source.capture()?;
    compose(captures)
}
