//! Bitmap rasterization using tiny-skia
//!
//! These functions draw strokes, shapes and overlay chrome onto `RgbaImage`s.
//! Each call rasterizes into a scratch pixmap sized to the touched area and
//! blends it back, so pixels outside the stroke are never rewritten.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use super::geometry::{self, arrow, shape};
use crate::domain::{Point, Rect, ShapeKind, StrokeStyle};

/// Rasterize into a scratch pixmap covering `area` and blend the result onto `img`
fn with_scratch(img: &mut RgbaImage, area: Rect, f: impl FnOnce(&mut Pixmap, Transform)) {
    let bounds = Rect::new(0, 0, img.width() as i32, img.height() as i32);
    let Some(region) = area.intersect(bounds) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::new(region.width() as u32, region.height() as u32) else {
        return;
    };

    f(
        &mut pixmap,
        Transform::from_translate(-region.left as f32, -region.top as f32),
    );

    let width = region.width() as usize;
    for (i, px) in pixmap.pixels().iter().enumerate() {
        if px.alpha() == 0 {
            continue;
        }
        let c = px.demultiply();
        let x = region.left as u32 + (i % width) as u32;
        let y = region.top as u32 + (i / width) as u32;
        blend_pixel(img, x, y, [c.red(), c.green(), c.blue(), c.alpha()]);
    }
}

/// Source-over blend of a straight-alpha color onto one pixel
pub fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, [r, g, b, a]: [u8; 4]) {
    if a == 0 || x >= img.width() || y >= img.height() {
        return;
    }
    let dst = img.get_pixel(x, y).0;
    let src_a = a as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }
    let blend = |src: u8, dst: u8| {
        let src_f = src as f32 / 255.0;
        let dst_f = dst as f32 / 255.0;
        ((src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    img.put_pixel(
        x,
        y,
        Rgba([
            blend(r, dst[0]),
            blend(g, dst[1]),
            blend(b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]),
    );
}

fn paint_rgba(rgba: [u8; 4]) -> Paint<'static> {
    let [r, g, b, a] = rgba;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Path bounds grown by `pad` on every side, in whole pixels
fn padded_area(path: &Path, pad: f32) -> Rect {
    let b = path.bounds();
    Rect::new(
        (b.left() - pad).floor() as i32,
        (b.top() - pad).floor() as i32,
        (b.right() + pad).ceil() as i32,
        (b.bottom() + pad).ceil() as i32,
    )
}

fn line_path(from: (f32, f32), to: (f32, f32)) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    pb.finish()
}

fn rect_path(start: (f32, f32), end: (f32, f32)) -> Option<Path> {
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(start.0, start.1, end.0, end.1);
    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Build an ellipse path using cubic bezier curves
fn ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

fn triangle_path(points: [(f32, f32); 3]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    pb.line_to(points[1].0, points[1].1);
    pb.line_to(points[2].0, points[2].1);
    pb.close();
    pb.finish()
}

fn stroke_onto(img: &mut RgbaImage, path: &Path, rgba: [u8; 4], stroke: &Stroke) {
    let paint = paint_rgba(rgba);
    with_scratch(img, padded_area(path, stroke.width + 1.0), |pixmap, transform| {
        pixmap.stroke_path(path, &paint, stroke, transform, None);
    });
}

fn fill_onto(img: &mut RgbaImage, path: &Path, rgba: [u8; 4]) {
    let paint = paint_rgba(rgba);
    with_scratch(img, padded_area(path, 1.0), |pixmap, transform| {
        pixmap.fill_path(path, &paint, FillRule::Winding, transform, None);
    });
}

/// Draw one freehand segment with round caps and joins
///
/// A zero-length segment leaves a round dot the size of the pen.
pub fn draw_segment(img: &mut RgbaImage, from: Point, to: Point, style: &StrokeStyle) {
    let rgba = style.color.to_rgba_u8();
    let width = style.width() as f32;
    if from == to {
        let (x, y) = from.to_f32();
        if let Some(dot) = PathBuilder::from_circle(x, y, width / 2.0) {
            fill_onto(img, &dot, rgba);
        }
        return;
    }
    if let Some(path) = line_path(from.to_f32(), to.to_f32()) {
        stroke_onto(img, &path, rgba, &round_stroke(width));
    }
}

/// Draw a committed or previewed shape spanning `start` to `end`
pub fn draw_shape(
    img: &mut RgbaImage,
    kind: ShapeKind,
    start: Point,
    end: Point,
    style: &StrokeStyle,
) {
    let rgba = style.color.to_rgba_u8();
    let width = style.width() as f32;
    let stroke = round_stroke(width);
    let (start, end) = (start.to_f32(), end.to_f32());

    match kind {
        ShapeKind::Rectangle => {
            if let Some(path) = rect_path(start, end) {
                stroke_onto(img, &path, rgba, &stroke);
            }
        }
        ShapeKind::Ellipse => {
            let (min_x, min_y, max_x, max_y) =
                geometry::normalize_rect(start.0, start.1, end.0, end.1);
            let (cx, cy, rx, ry) = geometry::ellipse_from_bounds(min_x, min_y, max_x, max_y);
            if let Some(path) = ellipse_path(cx, cy, rx, ry) {
                stroke_onto(img, &path, rgba, &stroke);
            }
        }
        ShapeKind::Line => {
            if let Some(path) = line_path(start, end) {
                stroke_onto(img, &path, rgba, &stroke);
            }
        }
        ShapeKind::Arrow => {
            if let Some(path) = line_path(start, end) {
                stroke_onto(img, &path, rgba, &stroke);
            }
            let [p1, p2] = arrow::head_points(start, end, width);
            if let Some(head) = triangle_path([end, p1, p2]) {
                fill_onto(img, &head, rgba);
                stroke_onto(img, &head, rgba, &stroke);
            }
        }
    }
}

/// Fill `rect` with a translucent or opaque color
pub fn fill_rect(img: &mut RgbaImage, rect: Rect, rgba: [u8; 4]) {
    let Some(area) = tiny_skia::Rect::from_ltrb(
        rect.left as f32,
        rect.top as f32,
        rect.right as f32,
        rect.bottom as f32,
    ) else {
        return;
    };
    let paint = paint_rgba(rgba);
    with_scratch(img, rect, |pixmap, transform| {
        pixmap.fill_rect(area, &paint, transform, None);
    });
}

/// Outline `rect`, optionally dashed with an (on, off) pattern
pub fn stroke_rect(img: &mut RgbaImage, rect: Rect, width: f32, dash: Option<[f32; 2]>, rgba: [u8; 4]) {
    let Some(path) = rect_path(rect.top_left().to_f32(), rect.bottom_right().to_f32()) else {
        return;
    };
    let stroke = Stroke {
        width,
        dash: dash.and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0)),
        ..Default::default()
    };
    stroke_onto(img, &path, rgba, &stroke);
}

/// Outline a circle of `radius` around `center`
pub fn stroke_circle(img: &mut RgbaImage, center: Point, radius: f32, width: f32, rgba: [u8; 4]) {
    let (x, y) = center.to_f32();
    if let Some(path) = PathBuilder::from_circle(x, y, radius.max(0.5)) {
        stroke_onto(img, &path, rgba, &round_stroke(width));
    }
}
