//! Overlay session
//!
//! This module contains:
//! - Input and outcome types exchanged with the host
//! - Keyboard shortcut mapping
//! - The selection state machine
//! - The router tying selection and annotations together

pub mod messages;
pub mod router;
pub mod selection;
pub mod shortcuts;

pub use messages::{InputEvent, Key, Modifiers, RouterOutcome};
pub use router::InteractionRouter;
pub use selection::SelectionController;
