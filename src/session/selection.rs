//! Selection rectangle state machine
//!
//! Drag to create, grab a handle to resize, grab the inside to move. The
//! rectangle is kept normalized and inside the canvas after every mutation.

use crate::domain::{CursorShape, Handle, Point, Rect, SelectionState, Size};
use crate::render::geometry::selection::HANDLE_HIT_SIZE;

/// Gap between the selection and the size label / tool palette
const LABEL_OFFSET: Point = Point::new(10, -20);
const TOOLBAR_MARGIN: i32 = 10;

#[derive(Debug, Clone)]
pub struct SelectionController {
    bounds: Rect,
    rect: Rect,
    state: SelectionState,
    /// Drag anchor while creating
    origin: Point,
    /// Pointer minus the rect's top-left when the drag started
    offset: Point,
}

impl SelectionController {
    /// `bounds` is the canvas in canvas-local coordinates
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: bounds.normalized(),
            rect: Rect::default(),
            state: SelectionState::Idle,
            origin: Point::default(),
            offset: Point::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_valid(&self) -> bool {
        self.rect.is_valid()
    }

    /// Replace the selection, e.g. from a host-supplied region
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect.clamp_to(self.bounds);
        self.state = SelectionState::Idle;
    }

    pub fn clear(&mut self) {
        self.rect = Rect::default();
        self.state = SelectionState::Idle;
    }

    /// Handle whose hit zone contains `p`, corners first
    pub fn handle_at(&self, p: Point) -> Handle {
        if !self.rect.is_valid() {
            return Handle::None;
        }
        let half = HANDLE_HIT_SIZE / 2;
        Handle::HIT_ORDER
            .into_iter()
            .find(|handle| {
                handle.anchor(&self.rect).is_some_and(|a| {
                    Rect::from_xywh(a.x - half, a.y - half, HANDLE_HIT_SIZE, HANDLE_HIT_SIZE)
                        .contains(p)
                })
            })
            .unwrap_or(Handle::None)
    }

    /// Cursor for hovering at `p` while no drawing tool is active
    pub fn cursor_at(&self, p: Point) -> CursorShape {
        match self.state {
            SelectionState::Resizing(handle) => return handle.cursor(),
            SelectionState::Moving => return CursorShape::Move,
            SelectionState::Creating => return CursorShape::Crosshair,
            SelectionState::Idle => {}
        }
        match self.handle_at(p) {
            Handle::None if self.rect.contains(p) => CursorShape::Move,
            handle => handle.cursor(),
        }
    }

    pub fn pointer_down(&mut self, p: Point) {
        let handle = self.handle_at(p);
        if handle != Handle::None {
            self.state = SelectionState::Resizing(handle);
            self.offset = p - self.rect.top_left();
        } else if self.rect.is_valid() && self.rect.contains(p) {
            self.state = SelectionState::Moving;
            self.offset = p - self.rect.top_left();
        } else {
            self.state = SelectionState::Creating;
            self.origin = p;
            self.rect = Rect::at(p).clamp_to(self.bounds);
        }
    }

    /// Returns true when the rectangle changed
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let before = self.rect;
        match self.state {
            SelectionState::Idle => return false,
            SelectionState::Creating => {
                self.rect = Rect::from_points(self.origin, p).clamp_to(self.bounds);
            }
            SelectionState::Resizing(handle) => {
                let (rect, handle) = resize(self.rect, handle, p);
                self.rect = rect.clamp_to(self.bounds);
                self.state = SelectionState::Resizing(handle);
            }
            SelectionState::Moving => {
                let target = p - self.offset;
                let max_x = self.bounds.left + (self.bounds.width() - self.rect.width()).max(0);
                let max_y = self.bounds.top + (self.bounds.height() - self.rect.height()).max(0);
                let top_left = Point::new(
                    target.x.clamp(self.bounds.left, max_x),
                    target.y.clamp(self.bounds.top, max_y),
                );
                self.rect = self.rect.moved_to(top_left);
            }
        }
        self.rect != before
    }

    pub fn pointer_up(&mut self) {
        if self.state != SelectionState::Idle && self.rect.is_valid() {
            log::debug!("Selection committed: {:?}", self.rect);
        }
        self.state = SelectionState::Idle;
    }

    /// `"Size: W x H"` and where to show it
    pub fn size_label(&self) -> Option<(String, Point)> {
        if !self.rect.is_valid() {
            return None;
        }
        Some((
            format!("Size: {} x {}", self.rect.width(), self.rect.height()),
            self.rect.top_right() + LABEL_OFFSET,
        ))
    }

    /// Top-left for a tool palette of `toolbar` size beside the selection
    pub fn toolbar_anchor(&self, toolbar: Size) -> Option<Point> {
        if !self.rect.is_valid() {
            return None;
        }
        let mut pos = self.rect.top_right() + Point::new(TOOLBAR_MARGIN, TOOLBAR_MARGIN);
        if pos.x + toolbar.width > self.bounds.right {
            pos.x = self.bounds.right - toolbar.width - TOOLBAR_MARGIN;
        }
        if pos.y + toolbar.height > self.bounds.bottom {
            pos.y = self.bounds.bottom - toolbar.height - TOOLBAR_MARGIN;
        }
        Some(pos)
    }
}

/// Move the edges `handle` controls to `p`
///
/// When the drag crosses the opposite edge the rect flips and the handle
/// follows to the mirrored side, so the drag keeps working naturally.
fn resize(rect: Rect, handle: Handle, p: Point) -> (Rect, Handle) {
    let mut r = rect;
    match handle {
        Handle::None => return (rect, handle),
        Handle::TopLeft => (r.left, r.top) = (p.x, p.y),
        Handle::TopRight => (r.right, r.top) = (p.x, p.y),
        Handle::BottomLeft => (r.left, r.bottom) = (p.x, p.y),
        Handle::BottomRight => (r.right, r.bottom) = (p.x, p.y),
        Handle::Top => r.top = p.y,
        Handle::Bottom => r.bottom = p.y,
        Handle::Left => r.left = p.x,
        Handle::Right => r.right = p.x,
    }
    let mut handle = handle;
    if r.left > r.right {
        handle = handle.mirrored_horizontally();
    }
    if r.top > r.bottom {
        handle = handle.mirrored_vertically();
    }
    (r.normalized(), handle)
}
