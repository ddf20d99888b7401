//=========================================================================
// Input Manager
//=========================================================================
//
// Forwards raw platform input into the event system and keeps an
// unbuffered view of the input state.
//
// Architecture:
//   InputEvent ─► StateTracker (state first)
//              └► KeyboardEvent / MouseEvent ─► EventManager::inject_event
//
// The manager owns no dispatch logic; every translated event goes
// through the same injection path as game events, bindings included.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};
use super::state_tracker::StateTracker;
use crate::core::error::EngineError;
use crate::core::event::{Event, EventManager, KeyboardEvent, MouseAction, MouseEvent};

//=== InputManager ========================================================

/// Turns raw input into [`KeyboardEvent`]s and [`MouseEvent`]s.
#[derive(Debug, Default)]
pub struct InputManager {
    state: StateTracker,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Processes one frame of raw input in order.
    ///
    /// The state is updated before each translated event is injected, so
    /// listeners querying [`state`](Self::state) afterwards see it
    /// applied. Every input is forwarded even if an injection fails.
    ///
    /// # Errors
    ///
    /// The first error returned by [`EventManager::inject_event`].
    pub fn process_frame<'a, I>(
        &mut self,
        events: I,
        event_manager: &EventManager,
    ) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = &'a InputEvent>,
    {
        self.state.begin_frame();

        let mut first_error = None;
        for input in events {
            self.state.apply(input);

            let Some(event) = self.translate(input) else {
                trace!("Ignoring unidentified input");
                continue;
            };

            if let Err(e) = event_manager.inject_event(event) {
                first_error.get_or_insert(e);
            }
        }

        self.state.end_frame();
        first_error.map_or(Ok(()), Err)
    }

    /// Forgets all held keys and buttons.
    pub fn reset(&mut self) {
        self.state = StateTracker::new();
    }

    //--- Unbuffered Queries -----------------------------------------------

    pub fn state(&self) -> &StateTracker {
        &self.state
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.state.is_key_down(key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.state.is_button_down(button)
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.state.mouse_position()
    }

    //--- Internal Helpers -------------------------------------------------

    fn translate(&self, input: &InputEvent) -> Option<Box<dyn Event>> {
        let position = self.state.mouse_position();
        let mouse = |action: MouseAction, button: Option<MouseButton>, modifiers: Modifiers| -> Box<dyn Event> {
            Box::new(MouseEvent { action, button, position, modifiers })
        };

        let event: Box<dyn Event> = match *input {
            InputEvent::KeyDown { key, modifiers } => Box::new(KeyboardEvent::pressed(key, modifiers)),
            InputEvent::KeyUp { key, modifiers } => Box::new(KeyboardEvent::released(key, modifiers)),
            InputEvent::MouseButtonDown { button, modifiers } => {
                mouse(MouseAction::Pressed, Some(button), modifiers)
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                mouse(MouseAction::Released, Some(button), modifiers)
            }
            InputEvent::MouseMoved { .. } => {
                mouse(MouseAction::Moved, None, self.state.modifiers())
            }
            InputEvent::Unidentified => return None,
        };

        Some(event)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
