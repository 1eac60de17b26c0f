//! Pointer and keyboard events delivered by the host.

use crate::geometry::Side;
use crate::selection::ResizeHandle;
use crate::shapes::{EdgeKey, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What lies under the pointer when a press happens.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointerTarget {
    /// Empty canvas.
    #[default]
    Background,
    /// The body of a shape.
    Shape(ShapeId),
    /// A connector handle on one side of a shape.
    SideHandle(ShapeId, Side),
    /// A resize handle of a shape.
    ResizeHandle(ShapeId, ResizeHandle),
    /// A rendered connection.
    Connection(EdgeKey),
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Left-button event with no modifiers over `target`.
    pub fn new(position: Point, target: PointerTarget) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            target,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keys the board reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Delete,
    Backspace,
    Space,
    Escape,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Whether a text input currently has focus.
    pub text_input_focused: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            text_input_focused: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.text_input_focused = true;
        self
    }

    /// Lower-cased character, if the key is a character.
    pub fn char(&self) -> Option<char> {
        match self.key {
            Key::Character(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers::SHIFT.command());
    }

    #[test]
    fn test_key_char_is_lowercased() {
        assert_eq!(KeyEvent::new(Key::Character('Z')).char(), Some('z'));
        assert_eq!(KeyEvent::new(Key::Delete).char(), None);
    }

    #[test]
    fn test_pointer_event_builders() {
        let event = PointerEvent::new(Point::new(1.0, 2.0), PointerTarget::Background)
            .with_button(MouseButton::Middle)
            .with_modifiers(Modifiers::SHIFT);
        assert_eq!(event.button, MouseButton::Middle);
        assert!(event.modifiers.shift);
    }
}
