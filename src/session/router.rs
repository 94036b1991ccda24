//! Routes host input to the selection or the annotation engine
//!
//! The host owns one router per overlay and feeds it every event; keyboard
//! hooks capture the router they belong to instead of reaching for a global.

use image::RgbaImage;

use super::messages::{InputEvent, Key, Modifiers, RouterOutcome};
use super::selection::SelectionController;
use super::shortcuts::{Action, handle_key_event};
use crate::annotations::{AnnotationEngine, FontRasterizer, GlyphRasterizer, handlers_for};
use crate::capture::Canvas;
use crate::config::{Config, StrokeColor};
use crate::domain::{CursorShape, Point, Tool};
use crate::export::{Export, ExportTarget, project};
use crate::render::{OverlayFrame, paint};

pub struct InteractionRouter {
    canvas: Canvas,
    selection: SelectionController,
    engine: AnnotationEngine,
    tool: Tool,
    /// Last known pointer position
    pointer: Option<Point>,
    /// A drawing tool received a press and has not seen its release yet
    pressed: bool,
    dim_opacity: f32,
}

impl InteractionRouter {
    pub fn new(canvas: Canvas, config: &Config) -> Self {
        let mut engine = AnnotationEngine::from_config(canvas.size(), config);
        match FontRasterizer::load(config.font_path.as_deref()) {
            Some(font) => engine = engine.with_rasterizer(Box::new(font)),
            None => log::warn!("No usable font found, text tool disabled"),
        }
        let selection = SelectionController::new(canvas.local_bounds());
        Self {
            canvas,
            selection,
            engine,
            tool: Tool::None,
            pointer: None,
            pressed: false,
            dim_opacity: config.dim_opacity,
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Box<dyn GlyphRasterizer>) -> Self {
        self.engine = self.engine.with_rasterizer(rasterizer);
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionController {
        &mut self.selection
    }

    pub fn engine(&self) -> &AnnotationEngine {
        &self.engine
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Host palette picked a tool
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.engine.tool_changed();
        self.pressed = false;
        log::debug!("Tool changed: {:?} -> {tool:?}", self.tool);
        self.tool = tool;
    }

    /// Host palette picked a color
    pub fn set_color(&mut self, color: StrokeColor) {
        self.engine.set_color(color);
    }

    pub fn handle(&mut self, event: InputEvent) -> RouterOutcome {
        match event {
            InputEvent::PointerDown(p) => self.pointer_down(p),
            InputEvent::PointerMove(p) => self.pointer_move(p),
            InputEvent::PointerUp(p) => self.pointer_up(p),
            InputEvent::Wheel { notches } => {
                if self.engine.adjust_for_wheel(self.tool, notches) {
                    RouterOutcome::Repaint
                } else {
                    RouterOutcome::Ignored
                }
            }
            InputEvent::Key { key, modifiers } => self.key(key, modifiers),
        }
    }

    fn pointer_down(&mut self, p: Point) -> RouterOutcome {
        self.pointer = Some(p);
        match handlers_for(self.tool) {
            None => self.selection.pointer_down(p),
            Some(handlers) => {
                (handlers.on_press)(&mut self.engine, p);
                self.pressed = true;
            }
        }
        RouterOutcome::Repaint
    }

    fn pointer_move(&mut self, p: Point) -> RouterOutcome {
        self.pointer = Some(p);
        match handlers_for(self.tool) {
            None => {
                if self.selection.pointer_move(p) {
                    RouterOutcome::Repaint
                } else {
                    RouterOutcome::Ignored
                }
            }
            Some(handlers) => {
                if self.pressed {
                    (handlers.on_move)(&mut self.engine, p);
                }
                // The brush indicator follows the pointer
                RouterOutcome::Repaint
            }
        }
    }

    fn pointer_up(&mut self, p: Point) -> RouterOutcome {
        self.pointer = Some(p);
        match handlers_for(self.tool) {
            None => self.selection.pointer_up(),
            Some(handlers) => {
                if !std::mem::take(&mut self.pressed) {
                    return RouterOutcome::Ignored;
                }
                (handlers.on_release)(&mut self.engine, p);
            }
        }
        RouterOutcome::Repaint
    }

    fn key(&mut self, key: Key, modifiers: Modifiers) -> RouterOutcome {
        let editing = self.engine.text().is_some();
        let Some(action) = handle_key_event(key, modifiers, self.tool, editing) else {
            return RouterOutcome::Ignored;
        };
        match action {
            Action::FinishText => {
                self.engine.commit_text();
            }
            Action::DeselectTool => self.set_tool(Tool::None),
            Action::Close => {
                self.close();
                return RouterOutcome::Close;
            }
            Action::Undo => {
                if !self.engine.undo() {
                    return RouterOutcome::Ignored;
                }
            }
            Action::CopyAndClose => {
                // Typed text belongs in the copy
                self.engine.commit_text();
                return RouterOutcome::Copy;
            }
            Action::InsertChar(c) => {
                self.engine.insert_text(c.encode_utf8(&mut [0; 4]));
            }
            Action::Newline => {
                self.engine.newline();
            }
            Action::Backspace => {
                self.engine.backspace();
            }
        }
        RouterOutcome::Repaint
    }

    pub fn cursor_shape(&self) -> CursorShape {
        match self.tool {
            Tool::None => self
                .pointer
                .map_or(CursorShape::Default, |p| self.selection.cursor_at(p)),
            _ => CursorShape::Crosshair,
        }
    }

    /// Frame for the host window
    pub fn paint(&self) -> RgbaImage {
        let brush_at = self.pointer.filter(|_| self.tool != Tool::None);
        paint(&OverlayFrame {
            base: self.canvas.rgba(),
            engine: &self.engine,
            selection: self.selection.rect(),
            brush_at,
            dim_opacity: self.dim_opacity,
        })
    }

    /// Flattened selection for the export sinks
    pub fn export(&self, target: ExportTarget) -> Export {
        project(&self.canvas, self.engine.layer(), self.selection.rect(), target)
    }

    /// Overlay closing: drop every uncommitted state and the undo history
    pub fn close(&mut self) {
        self.engine.reset();
        self.selection.clear();
        self.tool = Tool::None;
        self.pointer = None;
        self.pressed = false;
        log::info!("Session closed");
    }
}
