//! Input events and router results
//!
//! Pointer coordinates are canvas-local logical units; the host converts
//! from its window space before handing events over.

use crate::domain::Point;

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    Character(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        control: false,
        shift: false,
    };
    pub const CONTROL: Self = Self {
        control: true,
        shift: false,
    };

    pub fn control(&self) -> bool {
        self.control
    }

    pub fn shift(&self) -> bool {
        self.shift
    }
}

/// Raw input delivered by the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    /// Wheel rotation in notches, positive away from the user
    Wheel { notches: i32 },
    Key { key: Key, modifiers: Modifiers },
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        Self::Key {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self::Key {
            key: Key::Character(c),
            modifiers: Modifiers::CONTROL,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// What the host should do after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterOutcome {
    /// State changed, schedule a repaint
    Repaint,
    /// Tear down the overlay
    Close,
    /// Export the current selection to the clipboard, then close
    Copy,
    /// Nothing changed
    Ignored,
}
