//! Annotation layer, drawing tools, and undo
//!
//! This module provides:
//! - The annotation engine owning the layer and undo history
//! - Per-tool pointer handlers
//! - Text regions and glyph rasterization

pub mod engine;
pub mod handlers;
mod history;
pub mod text;

pub use engine::AnnotationEngine;
pub use handlers::{ToolHandlers, handlers_for};
pub use text::{FontRasterizer, GlyphRasterizer, TextSession};
