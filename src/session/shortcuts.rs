use crate::domain::Tool;
use crate::session::messages::{Key, Modifiers};

/// Keyboard-triggered session actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Finalize the open text region (discarded when empty)
    FinishText,
    DeselectTool,
    Close,
    Undo,
    CopyAndClose,
    InsertChar(char),
    Newline,
    Backspace,
}

pub fn handle_key_event(
    key: Key,
    modifiers: Modifiers,
    tool: Tool,
    editing_text: bool,
) -> Option<Action> {
    match key {
        // Escape unwinds one level: open text, then active tool, then the overlay
        Key::Escape if tool == Tool::Text && editing_text => Some(Action::FinishText),
        Key::Escape if tool != Tool::None => Some(Action::DeselectTool),
        Key::Escape => Some(Action::Close),

        Key::Character(c) if c.eq_ignore_ascii_case(&'z') && modifiers.control() && !modifiers.shift() => {
            Some(Action::Undo)
        }
        Key::Character(c) if c.eq_ignore_ascii_case(&'c') && modifiers.control() => {
            Some(Action::CopyAndClose)
        }

        // Text editing only while a region is open
        Key::Enter if editing_text => Some(Action::Newline),
        Key::Backspace if editing_text => Some(Action::Backspace),
        Key::Character(c) if editing_text && !modifiers.control() && !c.is_control() => {
            Some(Action::InsertChar(c))
        }
        _ => None,
    }
}
