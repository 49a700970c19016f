//! Pointer and modifier input delivered by the host window.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
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

/// A single modifier key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Shift,
    #[default]
    Ctrl,
    Alt,
    Meta,
}

impl Modifiers {
    /// Check whether a modifier key is held.
    pub fn is_held(&self, key: ModifierKey) -> bool {
        match key {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// Pointer event in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Secondary-click menu request.
    ContextMenu {
        position: Point,
    },
    /// The pointer left the surface or the gesture was aborted.
    Cancel,
}

impl PointerEvent {
    /// Position of the event, if it carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. }
            | PointerEvent::ContextMenu { position } => Some(*position),
            PointerEvent::Cancel => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_held() {
        let mods = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert!(mods.is_held(ModifierKey::Ctrl));
        assert!(!mods.is_held(ModifierKey::Shift));
        assert_eq!(ModifierKey::default(), ModifierKey::Ctrl);
    }

    #[test]
    fn test_event_position() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(PointerEvent::Move { position: p }.position(), Some(p));
        assert_eq!(PointerEvent::Cancel.position(), None);
    }

    #[test]
    fn test_event_serde() {
        let event = PointerEvent::Down {
            position: Point::new(3.0, 4.0),
            button: MouseButton::Left,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
