//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-redraw accumulation of converted input on the platform thread.
//
// - discrete:   key and button transitions, in arrival order, with
//               consecutive identical entries collapsed
// - continuous: cursor movement, one entry per kind, latest wins
//
// drain() hands both lists to the platform for one channel message and
// leaves the buffer empty with its capacity intact.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;

//=== InputBuffer =========================================================

#[derive(Debug)]
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            discrete: Vec::with_capacity(64),
            continuous: HashSet::with_capacity(4),
        }
    }

    /// Routes `event` to the matching list.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_discrete() {
            self.push_discrete(event);
        } else if matches!(event, InputEvent::MouseMoved { .. }) {
            self.push_continuous(event);
        }
    }

    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// `InputEvent` equality ignores cursor coordinates, so `replace`
    /// swaps in the newer position.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    /// Takes everything buffered since the last drain, or `None` if
    /// nothing was.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = self.discrete.drain(..).collect();
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{KeyCode, Modifiers, MouseButton};

    fn down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut buffer = InputBuffer::new();
        buffer.push(down(KeyCode::KeyA));
        buffer.push(down(KeyCode::KeyA));
        buffer.push(down(KeyCode::KeyB));
        buffer.push(down(KeyCode::KeyA));

        let (discrete, _) = buffer.drain().unwrap();
        assert_eq!(discrete, vec![down(KeyCode::KeyA), down(KeyCode::KeyB), down(KeyCode::KeyA)]);
    }

    #[test]
    fn cursor_movement_keeps_latest_position() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MouseMoved { x: 10.0, y: 10.0 });
        buffer.push(InputEvent::MouseMoved { x: 20.0, y: 30.0 });
        assert_eq!(buffer.continuous.len(), 1);

        let (_, continuous) = buffer.drain().unwrap();
        match continuous.as_slice() {
            [InputEvent::MouseMoved { x, y }] => assert_eq!((*x, *y), (20.0, 30.0)),
            other => panic!("Expected one MouseMoved, got {:?}", other),
        }
    }

    #[test]
    fn push_routes_by_kind() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::NONE });
        buffer.push(InputEvent::MouseMoved { x: 1.0, y: 1.0 });
        buffer.push(InputEvent::Unidentified);

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!(discrete.len(), 1);
        assert_eq!(continuous.len(), 1);
    }

    #[test]
    fn drain_empties_and_reports_nothing_when_idle() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.drain().is_none());

        buffer.push(down(KeyCode::Space));
        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn drain_keeps_capacity() {
        let mut buffer = InputBuffer::new();
        for i in 0..200 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push(down(key));
        }
        let capacity = buffer.discrete.capacity();

        buffer.drain();

        assert_eq!(buffer.discrete.capacity(), capacity);
    }
}
