//! Rendering module
//!
//! This module contains:
//! - Geometry constants and calculations shared by all drawing
//! - Bitmap rasterization using tiny-skia
//! - The overlay painter invoked on every repaint

pub mod geometry;
pub mod image;
pub mod overlay;

pub use overlay::{OverlayFrame, paint};
