//! Full overlay frame shown to the user on every repaint

use image::RgbaImage;
use image::imageops;

use super::geometry::selection::{
    HANDLE_DRAW_SIZE, INDICATOR_WIDTH, OUTLINE_COLOR, OUTLINE_DASH, OUTLINE_WIDTH,
};
use super::image::{draw_shape, fill_rect, stroke_circle, stroke_rect};
use crate::annotations::AnnotationEngine;
use crate::domain::{Handle, Point, Rect};

/// Everything the painter reads; borrowed from the session for one frame
pub struct OverlayFrame<'a> {
    pub base: &'a RgbaImage,
    pub engine: &'a AnnotationEngine,
    pub selection: Rect,
    /// Pointer position when a drawing tool is active
    pub brush_at: Option<Point>,
    /// Darkening outside the selection, 0.0 to 1.0
    pub dim_opacity: f32,
}

/// Paint one frame: composed bitmap dimmed outside the selection, selection
/// chrome, the in-progress shape and text, then the brush indicator
pub fn paint(frame: &OverlayFrame) -> RgbaImage {
    let mut out = frame.base.clone();
    imageops::overlay(&mut out, frame.engine.layer(), 0, 0);

    let canvas = Rect::new(0, 0, out.width() as i32, out.height() as i32);
    let selection = frame
        .selection
        .intersect(canvas)
        .filter(|_| frame.selection.is_valid());
    let alpha = (frame.dim_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    if alpha > 0 {
        match selection {
            Some(sel) => dim_around(&mut out, canvas, sel, [0, 0, 0, alpha]),
            None => fill_rect(&mut out, canvas, [0, 0, 0, alpha]),
        }
    }

    if let Some(sel) = selection {
        draw_selection_chrome(&mut out, sel);
    }

    let stroke = frame.engine.stroke();
    if let Some(preview) = frame.engine.preview() {
        draw_shape(&mut out, preview.kind, preview.start, preview.end, stroke);
    }

    if let Some(text) = frame.engine.text()
        && let Some(rasterizer) = frame.engine.rasterizer()
    {
        text.render(&mut out, rasterizer);
        let rgba = text.style.color.to_rgba_u8();
        stroke_rect(&mut out, text.bounds(rasterizer), 1.0, Some(OUTLINE_DASH), rgba);
    }

    if let Some(p) = frame.brush_at {
        let radius = stroke.width() as f32;
        stroke_circle(&mut out, p, radius, INDICATOR_WIDTH, stroke.color.to_rgba_u8());
    }

    out
}

/// Four strips (top, bottom, left, right) around `sel`, leaving it clear
fn dim_around(img: &mut RgbaImage, outer: Rect, sel: Rect, rgba: [u8; 4]) {
    // Top strip
    if sel.top > outer.top {
        fill_rect(img, Rect::new(outer.left, outer.top, outer.right, sel.top), rgba);
    }
    // Bottom strip
    if sel.bottom < outer.bottom {
        fill_rect(img, Rect::new(outer.left, sel.bottom, outer.right, outer.bottom), rgba);
    }
    // Left strip (between top and bottom)
    if sel.left > outer.left {
        fill_rect(img, Rect::new(outer.left, sel.top, sel.left, sel.bottom), rgba);
    }
    // Right strip (between top and bottom)
    if sel.right < outer.right {
        fill_rect(img, Rect::new(sel.right, sel.top, outer.right, sel.bottom), rgba);
    }
}

fn draw_selection_chrome(img: &mut RgbaImage, sel: Rect) {
    let color = OUTLINE_COLOR.to_rgba_u8();
    stroke_rect(img, sel, OUTLINE_WIDTH, Some(OUTLINE_DASH), color);

    let half = (HANDLE_DRAW_SIZE / 2.0).round() as i32;
    let size = HANDLE_DRAW_SIZE as i32;
    for handle in Handle::HIT_ORDER {
        if let Some(a) = handle.anchor(&sel) {
            fill_rect(img, Rect::from_xywh(a.x - half, a.y - half, size, size), color);
        }
    }
}
