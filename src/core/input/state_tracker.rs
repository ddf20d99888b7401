//=========================================================================
// State Tracker
//=========================================================================
//
// Unbuffered input state: what is held right now, and what changed
// during the current frame.
//
// Frame lifecycle: begin_frame() → apply() per event → end_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Held keys/buttons plus per-frame transitions and cursor movement.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State ------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    modifiers: Modifiers,

    //--- Frame Deltas ----------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    frame_start_position: (f32, f32),
    mouse_delta: (f32, f32),
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Forgets the previous frame's transitions.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.frame_start_position = self.mouse_position;
    }

    /// Folds one input event into the state.
    pub(crate) fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = modifiers;
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = (x, y);
            }
            InputEvent::Unidentified => {}
        }
    }

    /// Computes the frame's cursor movement.
    pub(crate) fn end_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.frame_start_position.0,
            self.mouse_position.1 - self.frame_start_position.1,
        );
    }

    //--- Keyboard Queries -------------------------------------------------

    /// `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` only during the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `true` only during the frame the key came up.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    //--- Mouse Queries ----------------------------------------------------

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key, modifiers: Modifiers::NONE }
    }

    fn run_frame(tracker: &mut StateTracker, events: &[InputEvent]) {
        tracker.begin_frame();
        for event in events {
            tracker.apply(event);
        }
        tracker.end_frame();
    }

    #[test]
    fn pressed_lasts_one_frame_down_persists() {
        let mut tracker = StateTracker::new();

        run_frame(&mut tracker, &[key_down(KeyCode::KeyW)]);
        assert!(tracker.is_key_pressed(KeyCode::KeyW));
        assert!(tracker.is_key_down(KeyCode::KeyW));

        run_frame(&mut tracker, &[]);
        assert!(!tracker.is_key_pressed(KeyCode::KeyW));
        assert!(tracker.is_key_down(KeyCode::KeyW));

        run_frame(&mut tracker, &[key_up(KeyCode::KeyW)]);
        assert!(tracker.is_key_released(KeyCode::KeyW));
        assert!(!tracker.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn repeated_key_down_is_not_a_new_press() {
        let mut tracker = StateTracker::new();
        run_frame(&mut tracker, &[key_down(KeyCode::Space)]);
        run_frame(&mut tracker, &[key_down(KeyCode::Space)]);
        assert!(!tracker.is_key_pressed(KeyCode::Space));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = StateTracker::new();
        run_frame(&mut tracker, &[key_up(KeyCode::KeyQ)]);
        assert!(!tracker.is_key_released(KeyCode::KeyQ));
    }

    #[test]
    fn buttons_and_modifiers_tracked() {
        let mut tracker = StateTracker::new();
        run_frame(
            &mut tracker,
            &[InputEvent::MouseButtonDown { button: MouseButton::Right, modifiers: Modifiers::SHIFT }],
        );
        assert!(tracker.is_button_pressed(MouseButton::Right));
        assert!(tracker.is_button_down(MouseButton::Right));
        assert_eq!(tracker.modifiers(), Modifiers::SHIFT);

        run_frame(
            &mut tracker,
            &[InputEvent::MouseButtonUp { button: MouseButton::Right, modifiers: Modifiers::NONE }],
        );
        assert!(tracker.is_button_released(MouseButton::Right));
        assert!(!tracker.is_button_down(MouseButton::Right));
    }

    #[test]
    fn mouse_delta_spans_the_frame() {
        let mut tracker = StateTracker::new();
        run_frame(&mut tracker, &[InputEvent::MouseMoved { x: 10.0, y: 10.0 }]);
        run_frame(
            &mut tracker,
            &[
                InputEvent::MouseMoved { x: 15.0, y: 12.0 },
                InputEvent::MouseMoved { x: 20.0, y: 30.0 },
            ],
        );
        assert_eq!(tracker.mouse_position(), (20.0, 30.0));
        assert_eq!(tracker.mouse_delta(), (10.0, 20.0));

        run_frame(&mut tracker, &[]);
        assert_eq!(tracker.mouse_delta(), (0.0, 0.0));
    }
}
