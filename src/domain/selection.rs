//! Selection handle and cursor types

use super::geometry::{Point, Rect};

/// Edge or corner of the selection being dragged
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl Handle {
    /// Hit-test priority: corners before edges so overlapping zones resolve to the corner
    pub const HIT_ORDER: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Bottom,
        Handle::Left,
        Handle::Right,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }

    /// Anchor point of this handle on `rect`
    pub fn anchor(self, rect: &Rect) -> Option<Point> {
        let mid_x = rect.left + rect.width() / 2;
        let mid_y = rect.top + rect.height() / 2;
        match self {
            Handle::None => None,
            Handle::TopLeft => Some(rect.top_left()),
            Handle::TopRight => Some(rect.top_right()),
            Handle::BottomLeft => Some(rect.bottom_left()),
            Handle::BottomRight => Some(rect.bottom_right()),
            Handle::Top => Some(Point::new(mid_x, rect.top)),
            Handle::Bottom => Some(Point::new(mid_x, rect.bottom)),
            Handle::Left => Some(Point::new(rect.left, mid_y)),
            Handle::Right => Some(Point::new(rect.right, mid_y)),
        }
    }

    /// The handle on the opposite side after the rect flips left/right
    pub fn mirrored_horizontally(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::TopRight,
            Handle::TopRight => Handle::TopLeft,
            Handle::BottomLeft => Handle::BottomRight,
            Handle::BottomRight => Handle::BottomLeft,
            Handle::Left => Handle::Right,
            Handle::Right => Handle::Left,
            other => other,
        }
    }

    /// The handle on the opposite side after the rect flips top/bottom
    pub fn mirrored_vertically(self) -> Handle {
        match self {
            Handle::TopLeft => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopLeft,
            Handle::TopRight => Handle::BottomRight,
            Handle::BottomRight => Handle::TopRight,
            Handle::Top => Handle::Bottom,
            Handle::Bottom => Handle::Top,
            other => other,
        }
    }

    pub fn cursor(self) -> CursorShape {
        match self {
            Handle::TopLeft | Handle::BottomRight => CursorShape::ResizeDiagonal,
            Handle::TopRight | Handle::BottomLeft => CursorShape::ResizeAntiDiagonal,
            Handle::Top | Handle::Bottom => CursorShape::ResizeVertical,
            Handle::Left | Handle::Right => CursorShape::ResizeHorizontal,
            Handle::None => CursorShape::Default,
        }
    }
}

/// Pointer feedback requested from the host
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Default,
    /// Drawing tool active
    Crosshair,
    /// Inside the selection
    Move,
    /// TopLeft / BottomRight
    ResizeDiagonal,
    /// TopRight / BottomLeft
    ResizeAntiDiagonal,
    ResizeVertical,
    ResizeHorizontal,
}

/// Where the selection drag currently is
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    Creating,
    Resizing(Handle),
    Moving,
}
