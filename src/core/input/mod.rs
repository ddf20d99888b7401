//=========================================================================
// Input
//=========================================================================
//
// Raw input types and the manager that forwards them into the event
// system.
//
// Components:
// - `event`: platform-neutral keys, buttons, modifiers and InputEvent
// - `state_tracker`: unbuffered held/pressed/released state
// - `input_manager`: InputEvent → KeyboardEvent / MouseEvent injection
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod input_manager;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_manager::InputManager;
pub use state_tracker::StateTracker;
