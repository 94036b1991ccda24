//! Annotation layer and drawing operations
//!
//! All drawing goes onto a transparent layer the size of the canvas; the
//! captured bitmap underneath is never touched. Every committed operation
//! snapshots the layer first so `undo` can restore it exactly.

use image::RgbaImage;

use super::history::History;
use super::text::{GlyphRasterizer, TextSession};
use crate::config::{Config, StrokeColor};
use crate::domain::{Point, ShapeKind, ShapePreview, Size, StrokeStyle, TextStyle, Tool};
use crate::render::image::{draw_segment, draw_shape};

pub struct AnnotationEngine {
    layer: RgbaImage,
    history: History,
    stroke: StrokeStyle,
    text_style: TextStyle,
    /// Previous pen position while a freehand stroke is in progress
    last_point: Option<Point>,
    preview: Option<ShapePreview>,
    text: Option<TextSession>,
    rasterizer: Option<Box<dyn GlyphRasterizer>>,
}

impl AnnotationEngine {
    pub fn new(size: Size, stroke: StrokeStyle, text_style: TextStyle, undo_limit: Option<usize>) -> Self {
        let width = size.width.max(0) as u32;
        let height = size.height.max(0) as u32;
        Self {
            layer: RgbaImage::new(width, height),
            history: History::new(undo_limit),
            stroke,
            text_style,
            last_point: None,
            preview: None,
            text: None,
            rasterizer: None,
        }
    }

    pub fn from_config(size: Size, config: &Config) -> Self {
        Self::new(
            size,
            StrokeStyle::new(config.pen_color, config.stroke_width),
            TextStyle::new(config.pen_color, config.font_size),
            config.undo_limit,
        )
    }

    pub fn with_rasterizer(mut self, rasterizer: Box<dyn GlyphRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn layer(&self) -> &RgbaImage {
        &self.layer
    }

    pub fn stroke(&self) -> &StrokeStyle {
        &self.stroke
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn preview(&self) -> Option<&ShapePreview> {
        self.preview.as_ref()
    }

    pub fn text(&self) -> Option<&TextSession> {
        self.text.as_ref()
    }

    pub fn rasterizer(&self) -> Option<&dyn GlyphRasterizer> {
        self.rasterizer.as_deref()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn is_stroking(&self) -> bool {
        self.last_point.is_some()
    }

    /// Applies to future strokes and to the open text region
    pub fn set_color(&mut self, color: StrokeColor) {
        self.stroke.color = color;
        self.text_style.color = color;
        if let Some(text) = self.text.as_mut() {
            text.style.color = color;
        }
    }

    fn save_state_for_undo(&mut self) {
        self.history.push(self.layer.clone());
    }

    // Freehand

    pub fn begin_stroke(&mut self, p: Point) {
        self.save_state_for_undo();
        draw_segment(&mut self.layer, p, p, &self.stroke);
        self.last_point = Some(p);
    }

    pub fn extend_stroke(&mut self, p: Point) {
        let Some(last) = self.last_point else {
            return;
        };
        draw_segment(&mut self.layer, last, p, &self.stroke);
        self.last_point = Some(p);
    }

    pub fn end_stroke(&mut self) {
        if self.last_point.take().is_some() {
            log::debug!("Committed freehand stroke, width {}", self.stroke.width());
        }
    }

    // Shapes

    pub fn begin_shape(&mut self, kind: ShapeKind, p: Point) {
        self.preview = Some(ShapePreview {
            kind,
            start: p,
            end: p,
        });
    }

    pub fn update_shape(&mut self, p: Point) {
        if let Some(preview) = self.preview.as_mut() {
            preview.end = p;
        }
    }

    /// Paint the previewed shape onto the layer; a shape with no extent is dropped
    pub fn commit_shape(&mut self) -> bool {
        let Some(preview) = self.preview.take() else {
            return false;
        };
        if preview.start == preview.end {
            log::debug!("Dropped zero-size {:?}", preview.kind);
            return false;
        }
        self.save_state_for_undo();
        draw_shape(&mut self.layer, preview.kind, preview.start, preview.end, &self.stroke);
        log::debug!(
            "Committed {:?} from {:?} to {:?}",
            preview.kind,
            preview.start,
            preview.end
        );
        true
    }

    // Text

    pub fn open_text(&mut self, anchor: Point) {
        self.commit_text();
        self.text = Some(TextSession::new(anchor, self.text_style));
    }

    pub fn insert_text(&mut self, s: &str) -> bool {
        match self.text.as_mut() {
            Some(text) => {
                text.insert(s);
                true
            }
            None => false,
        }
    }

    pub fn newline(&mut self) -> bool {
        match self.text.as_mut() {
            Some(text) => {
                text.newline();
                true
            }
            None => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        match self.text.as_mut() {
            Some(text) => {
                text.backspace();
                true
            }
            None => false,
        }
    }

    /// Render the open text region onto the layer and close it
    ///
    /// Returns true when pixels were committed. Empty regions are discarded
    /// without an undo entry.
    pub fn commit_text(&mut self) -> bool {
        let Some(text) = self.text.take() else {
            return false;
        };
        if text.is_empty() {
            log::debug!("Discarded empty text region at {:?}", text.anchor);
            return false;
        }
        let Some(rasterizer) = self.rasterizer.as_deref() else {
            log::warn!("No font available, discarding text at {:?}", text.anchor);
            return false;
        };
        self.history.push(self.layer.clone());
        text.render(&mut self.layer, rasterizer);
        log::debug!(
            "Committed {} line(s) of text at {:?}",
            text.lines().count(),
            text.anchor
        );
        true
    }

    pub fn cancel_text(&mut self) {
        if self.text.take().is_some() {
            log::debug!("Cancelled text region");
        }
    }

    /// Restore the layer to the most recent snapshot; false when there is none
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.layer = snapshot;
                log::debug!("Undo, {} snapshot(s) left", self.history.len());
                true
            }
            None => false,
        }
    }

    /// Wheel gesture: stroke width for drawing tools, point size for text
    pub fn adjust_for_wheel(&mut self, tool: Tool, notches: i32) -> bool {
        if notches == 0 {
            return false;
        }
        match tool {
            Tool::Text => {
                let changed = self.text_style.adjust_size(notches);
                if changed && let Some(text) = self.text.as_mut() {
                    text.style = TextStyle::new(text.style.color, self.text_style.size());
                }
                changed
            }
            tool if tool.uses_stroke_width() => {
                let before = self.stroke.width();
                self.stroke.adjust_width(notches);
                before != self.stroke.width()
            }
            _ => false,
        }
    }

    /// Switching tools commits any open text and drops transient drag state
    pub fn tool_changed(&mut self) {
        self.commit_text();
        self.preview = None;
        self.end_stroke();
    }

    /// Drop all uncommitted state and the undo history
    pub fn reset(&mut self) {
        self.text = None;
        self.preview = None;
        self.last_point = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::text::tests::BlockRasterizer;

    fn engine() -> AnnotationEngine {
        AnnotationEngine::new(
            Size::new(64, 64),
            StrokeStyle::new(StrokeColor::RED, 3),
            TextStyle::new(StrokeColor::RED, 16.0),
            None,
        )
        .with_rasterizer(Box::new(BlockRasterizer))
    }

    fn draw_line(engine: &mut AnnotationEngine, from: Point, to: Point) {
        engine.begin_shape(ShapeKind::Line, from);
        engine.update_shape(to);
        assert!(engine.commit_shape());
    }

    #[test]
    fn test_undo_restores_each_prior_state() {
        let mut engine = engine();
        let mut states = vec![engine.layer().clone()];

        engine.begin_stroke(Point::new(5, 5));
        engine.extend_stroke(Point::new(30, 10));
        engine.end_stroke();
        states.push(engine.layer().clone());

        draw_line(&mut engine, Point::new(0, 40), Point::new(60, 40));
        states.push(engine.layer().clone());

        engine.begin_shape(ShapeKind::Ellipse, Point::new(10, 10));
        engine.update_shape(Point::new(50, 30));
        assert!(engine.commit_shape());

        engine.open_text(Point::new(2, 30));
        engine.insert_text("hi");
        states.push(engine.layer().clone());
        assert!(engine.commit_text());

        assert_eq!(engine.undo_depth(), 4);
        // states: before op1, after op1, after op2, after op3
        assert!(engine.undo());
        assert_eq!(engine.layer(), &states[3]);
        assert!(engine.undo());
        assert_eq!(engine.layer(), &states[2]);
        assert!(engine.undo());
        assert_eq!(engine.layer(), &states[1]);
        assert!(engine.undo());
        assert_eq!(engine.layer(), &states[0]);
    }

    #[test]
    fn test_undo_past_depth_is_noop() {
        let mut engine = engine();
        assert!(!engine.undo());
        draw_line(&mut engine, Point::new(0, 0), Point::new(20, 20));
        let blank = RgbaImage::new(64, 64);
        assert!(engine.undo());
        assert!(!engine.undo());
        assert_eq!(engine.layer(), &blank);
    }

    #[test]
    fn test_pen_paints_incrementally() {
        let mut engine = engine();
        engine.begin_stroke(Point::new(10, 10));
        assert_ne!(engine.layer().get_pixel(10, 10).0[3], 0);
        engine.extend_stroke(Point::new(40, 10));
        assert_ne!(engine.layer().get_pixel(25, 10).0[3], 0);
        assert!(engine.is_stroking());
        engine.end_stroke();
        assert!(!engine.is_stroking());
        assert_eq!(engine.undo_depth(), 1);
    }

    #[test]
    fn test_shape_preview_is_not_painted_until_commit() {
        let mut engine = engine();
        engine.begin_shape(ShapeKind::Rectangle, Point::new(10, 10));
        engine.update_shape(Point::new(40, 40));
        assert!(engine.layer().pixels().all(|p| p.0[3] == 0));
        assert_eq!(engine.preview().map(|p| p.end), Some(Point::new(40, 40)));

        assert!(engine.commit_shape());
        assert!(engine.preview().is_none());
        assert_ne!(engine.layer().get_pixel(10, 25).0[3], 0);
    }

    #[test]
    fn test_zero_size_shape_is_skipped() {
        let mut engine = engine();
        engine.begin_shape(ShapeKind::Arrow, Point::new(10, 10));
        assert!(!engine.commit_shape());
        assert_eq!(engine.undo_depth(), 0);
    }

    #[test]
    fn test_empty_text_discarded_without_undo() {
        let mut engine = engine();
        engine.open_text(Point::new(5, 5));
        assert!(!engine.commit_text());
        assert!(engine.text().is_none());
        assert_eq!(engine.undo_depth(), 0);

        engine.open_text(Point::new(5, 5));
        engine.insert_text("x");
        engine.cancel_text();
        assert_eq!(engine.undo_depth(), 0);
        assert!(engine.layer().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_text_without_rasterizer_is_dropped() {
        let mut engine = AnnotationEngine::new(
            Size::new(32, 32),
            StrokeStyle::default(),
            TextStyle::default(),
            None,
        );
        engine.open_text(Point::new(1, 1));
        engine.insert_text("lost");
        assert!(!engine.commit_text());
        assert_eq!(engine.undo_depth(), 0);
    }

    #[test]
    fn test_opening_text_commits_previous_region() {
        let mut engine = engine();
        engine.open_text(Point::new(0, 0));
        engine.insert_text("ab");
        engine.open_text(Point::new(0, 30));
        assert_eq!(engine.undo_depth(), 1);
        assert_eq!(engine.text().map(|t| t.anchor), Some(Point::new(0, 30)));
    }

    #[test]
    fn test_wheel_adjusts_width_or_font_size() {
        let mut engine = engine();
        assert!(engine.adjust_for_wheel(Tool::Pen, 2));
        assert_eq!(engine.stroke().width(), 5);
        engine.adjust_for_wheel(Tool::Arrow, 100);
        assert_eq!(engine.stroke().width(), StrokeStyle::MAX_WIDTH);
        engine.adjust_for_wheel(Tool::Line, -100);
        assert_eq!(engine.stroke().width(), StrokeStyle::MIN_WIDTH);

        engine.open_text(Point::new(0, 0));
        assert!(engine.adjust_for_wheel(Tool::Text, 4));
        assert_eq!(engine.text_style().size(), 20.0);
        assert_eq!(engine.text().map(|t| t.style.size()), Some(20.0));
        assert!(!engine.adjust_for_wheel(Tool::Text, -20));
        assert_eq!(engine.text_style().size(), 20.0);
        assert!(!engine.adjust_for_wheel(Tool::None, 1));
    }

    #[test]
    fn test_set_color_reaches_open_text() {
        let mut engine = engine();
        engine.open_text(Point::new(0, 0));
        engine.set_color(StrokeColor::BLACK);
        assert_eq!(engine.stroke().color, StrokeColor::BLACK);
        assert_eq!(engine.text().map(|t| t.style.color), Some(StrokeColor::BLACK));
    }

    #[test]
    fn test_reset_clears_history_and_transients() {
        let mut engine = engine();
        draw_line(&mut engine, Point::new(0, 0), Point::new(9, 9));
        engine.begin_shape(ShapeKind::Ellipse, Point::new(1, 1));
        engine.open_text(Point::new(3, 3));
        engine.reset();
        assert_eq!(engine.undo_depth(), 0);
        assert!(engine.preview().is_none());
        assert!(engine.text().is_none());
    }
}
