//=========================================================================
// Prelude
//=========================================================================
//
// Commonly used types and traits.
//
// Usage:
//   use bindery::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};

// Lifecycle and configuration
pub use crate::core::{EngineError, EventConfig, Root};

// Events
pub use crate::core::event::{
    BindingId, Event, EventBinding, EventListener, EventManager, EventType, KeyAction,
    KeyboardEvent, MouseAction, MouseEvent, WindowClosedEvent,
};

// Input
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};
