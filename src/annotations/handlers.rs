//! Per-tool pointer handlers
//!
//! Each drawing tool maps to one `{on_press, on_move, on_release}` entry;
//! the router looks the entry up instead of branching on the tool itself.

use super::engine::AnnotationEngine;
use crate::domain::{Point, ShapeKind, Tool};

type PointerFn = fn(&mut AnnotationEngine, Point);

pub struct ToolHandlers {
    pub on_press: PointerFn,
    pub on_move: PointerFn,
    pub on_release: PointerFn,
}

fn ignore(_: &mut AnnotationEngine, _: Point) {}

// ============================================================================
// Pen
// ============================================================================

const PEN: ToolHandlers = ToolHandlers {
    on_press: |engine, p| engine.begin_stroke(p),
    on_move: |engine, p| engine.extend_stroke(p),
    on_release: |engine, _| engine.end_stroke(),
};

// ============================================================================
// Text
// ============================================================================

/// Clicking while a region is open commits it; otherwise a new one opens
fn text_press(engine: &mut AnnotationEngine, p: Point) {
    if engine.text().is_some() {
        engine.commit_text();
    } else {
        engine.open_text(p);
    }
}

const TEXT: ToolHandlers = ToolHandlers {
    on_press: text_press,
    on_move: ignore,
    on_release: ignore,
};

// ============================================================================
// Shapes
// ============================================================================

fn shape_move(engine: &mut AnnotationEngine, p: Point) {
    engine.update_shape(p);
}

fn shape_release(engine: &mut AnnotationEngine, p: Point) {
    engine.update_shape(p);
    engine.commit_shape();
}

const fn shape_handlers(on_press: PointerFn) -> ToolHandlers {
    ToolHandlers {
        on_press,
        on_move: shape_move,
        on_release: shape_release,
    }
}

const RECTANGLE: ToolHandlers = shape_handlers(|engine, p| engine.begin_shape(ShapeKind::Rectangle, p));
const ELLIPSE: ToolHandlers = shape_handlers(|engine, p| engine.begin_shape(ShapeKind::Ellipse, p));
const LINE: ToolHandlers = shape_handlers(|engine, p| engine.begin_shape(ShapeKind::Line, p));
const ARROW: ToolHandlers = shape_handlers(|engine, p| engine.begin_shape(ShapeKind::Arrow, p));

/// Handlers for `tool`; `None` for the selection tool
pub fn handlers_for(tool: Tool) -> Option<&'static ToolHandlers> {
    match tool {
        Tool::None => None,
        Tool::Pen => Some(&PEN),
        Tool::Text => Some(&TEXT),
        Tool::Rectangle => Some(&RECTANGLE),
        Tool::Ellipse => Some(&ELLIPSE),
        Tool::Line => Some(&LINE),
        Tool::Arrow => Some(&ARROW),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::text::tests::BlockRasterizer;
    use crate::config::StrokeColor;
    use crate::domain::{Size, StrokeStyle, TextStyle};

    fn engine() -> AnnotationEngine {
        AnnotationEngine::new(
            Size::new(50, 50),
            StrokeStyle::new(StrokeColor::RED, 2),
            TextStyle::default(),
            None,
        )
        .with_rasterizer(Box::new(BlockRasterizer))
    }

    fn drag(engine: &mut AnnotationEngine, tool: Tool, from: Point, to: Point) {
        let handlers = handlers_for(tool).unwrap();
        (handlers.on_press)(engine, from);
        (handlers.on_move)(engine, to);
        (handlers.on_release)(engine, to);
    }

    #[test]
    fn test_every_drawing_tool_has_handlers() {
        for tool in Tool::ALL {
            assert_eq!(handlers_for(tool).is_some(), tool != Tool::None, "{tool:?}");
        }
    }

    #[test]
    fn test_shape_tools_commit_on_release() {
        for tool in [Tool::Rectangle, Tool::Ellipse, Tool::Line, Tool::Arrow] {
            let mut engine = engine();
            drag(&mut engine, tool, Point::new(5, 5), Point::new(40, 30));
            assert!(engine.preview().is_none(), "{tool:?}");
            assert_eq!(engine.undo_depth(), 1, "{tool:?}");
        }
    }

    #[test]
    fn test_shape_preview_tracks_moves() {
        let mut engine = engine();
        let handlers = handlers_for(Tool::Ellipse).unwrap();
        (handlers.on_press)(&mut engine, Point::new(1, 1));
        (handlers.on_move)(&mut engine, Point::new(20, 10));
        let preview = engine.preview().unwrap();
        assert_eq!(preview.kind, ShapeKind::Ellipse);
        assert_eq!(preview.end, Point::new(20, 10));
    }

    #[test]
    fn test_pen_drag_is_one_undo_step() {
        let mut engine = engine();
        drag(&mut engine, Tool::Pen, Point::new(5, 5), Point::new(30, 30));
        assert!(!engine.is_stroking());
        assert_eq!(engine.undo_depth(), 1);
    }

    #[test]
    fn test_text_press_toggles_region() {
        let mut engine = engine();
        let handlers = handlers_for(Tool::Text).unwrap();
        (handlers.on_press)(&mut engine, Point::new(4, 4));
        assert!(engine.text().is_some());
        engine.insert_text("note");
        (handlers.on_press)(&mut engine, Point::new(20, 20));
        assert!(engine.text().is_none());
        assert_eq!(engine.undo_depth(), 1);
    }
}
