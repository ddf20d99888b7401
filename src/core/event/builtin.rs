//=========================================================================
// Built-in Events
//=========================================================================
//
// Events the engine itself injects: keyboard and mouse input forwarded
// by the InputManager, and window closure reported by the platform.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::OnceLock;

//=== Internal Dependencies ===============================================

use super::{Event, EventType};
use crate::core::input::{KeyCode, Modifiers, MouseButton};
use crate::core::strings::StringManager;

//=== Type Names ==========================================================

pub const KEYBOARD_EVENT: &str = "keyboard";
pub const MOUSE_EVENT: &str = "mouse";
pub const WINDOW_CLOSED_EVENT: &str = "window_closed";

/// Registers the built-in event names with a string manager.
pub fn register_names(strings: &mut StringManager) {
    for name in [KEYBOARD_EVENT, MOUSE_EVENT, WINDOW_CLOSED_EVENT] {
        strings.add(name);
    }
}

/// Shared type id for a built-in event, allocated on first use.
fn shared_type(cell: &'static OnceLock<EventType>, name: &'static str) -> EventType {
    cell.get_or_init(|| EventType::new(name)).clone()
}

//=== WindowClosedEvent ===================================================

/// The window was closed; the engine is about to shut down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowClosedEvent;

impl Event for WindowClosedEvent {
    fn event_type(&self) -> EventType {
        static TYPE: OnceLock<EventType> = OnceLock::new();
        shared_type(&TYPE, WINDOW_CLOSED_EVENT)
    }
}

//=== KeyboardEvent =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pressed,
    Released,
}

/// A key changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub action: KeyAction,
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    pub fn pressed(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { action: KeyAction::Pressed, key, modifiers }
    }

    pub fn released(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { action: KeyAction::Released, key, modifiers }
    }
}

impl Event for KeyboardEvent {
    fn event_type(&self) -> EventType {
        static TYPE: OnceLock<EventType> = OnceLock::new();
        shared_type(&TYPE, KEYBOARD_EVENT)
    }
}

//=== MouseEvent ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Pressed,
    Released,
    Moved,
}

/// A mouse button changed state or the cursor moved.
///
/// `button` is `None` for movement. `position` is the cursor position at
/// the time of the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub button: Option<MouseButton>,
    pub position: (f32, f32),
    pub modifiers: Modifiers,
}

impl Event for MouseEvent {
    fn event_type(&self) -> EventType {
        static TYPE: OnceLock<EventType> = OnceLock::new();
        shared_type(&TYPE, MOUSE_EVENT)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_type_names() {
        assert_eq!(WindowClosedEvent.event_type(), WINDOW_CLOSED_EVENT);
        assert_eq!(
            KeyboardEvent::pressed(KeyCode::KeyA, Modifiers::NONE).event_type(),
            KEYBOARD_EVENT
        );
        let mouse = MouseEvent {
            action: MouseAction::Moved,
            button: None,
            position: (1.0, 2.0),
            modifiers: Modifiers::NONE,
        };
        assert_eq!(mouse.event_type(), MOUSE_EVENT);
    }

    #[test]
    fn builtin_types_are_allocated_once() {
        let a = KeyboardEvent::pressed(KeyCode::KeyA, Modifiers::NONE);
        let b = KeyboardEvent::released(KeyCode::KeyB, Modifiers::SHIFT);
        assert!(a.event_type().shares_storage(&b.event_type()));
        assert!(WindowClosedEvent.event_type().shares_storage(&WindowClosedEvent.event_type()));

        let moved = MouseEvent {
            action: MouseAction::Moved,
            button: None,
            position: (0.0, 0.0),
            modifiers: Modifiers::NONE,
        };
        let clicked = MouseEvent {
            action: MouseAction::Pressed,
            button: Some(MouseButton::Left),
            ..moved
        };
        assert!(moved.event_type().shares_storage(&clicked.event_type()));
        assert!(!moved.event_type().shares_storage(&a.event_type()));
    }

    #[test]
    fn builtin_types_are_shared_across_threads() {
        let here = WindowClosedEvent.event_type();
        let there = std::thread::spawn(|| WindowClosedEvent.event_type())
            .join()
            .unwrap();
        assert!(here.shares_storage(&there));
    }

    #[test]
    fn keyboard_event_downcasts_through_dyn() {
        let event: Box<dyn Event> = Box::new(KeyboardEvent::released(KeyCode::Escape, Modifiers::SHIFT));
        let keyboard = event.downcast_ref::<KeyboardEvent>().copied();
        assert_eq!(
            keyboard,
            Some(KeyboardEvent {
                action: KeyAction::Released,
                key: KeyCode::Escape,
                modifiers: Modifiers::SHIFT,
            })
        );
        assert!(event.downcast_ref::<MouseEvent>().is_none());
    }

    #[test]
    fn register_names_adds_all_three() {
        let mut strings = StringManager::new();
        register_names(&mut strings);
        assert!(strings.has(KEYBOARD_EVENT));
        assert!(strings.has(MOUSE_EVENT));
        assert!(strings.has(WINDOW_CLOSED_EVENT));
        assert_eq!(strings.len(), 3);
    }
}
