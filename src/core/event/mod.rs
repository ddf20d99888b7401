//=========================================================================
// Event System
//=========================================================================
//
// Typed, cloneable events dispatched synchronously to listeners, with a
// binding table that turns one event type into follow-up events.
//
// Architecture:
// ```text
//   inject_event(E)
//        │
//        ├─► listeners (registration order) ── handle_event(&E)
//        │
//        └─► BindingsManager::fire(type of E)
//                 └─► clone of each prototype ── inject (depth + 1)
// ```
//
// Events are owned by the dispatcher while in flight. Listeners only
// borrow them; bindings hand out fresh clones of their prototypes.
//
//=========================================================================

//=== Module Declarations =================================================

mod bindings;
pub mod builtin;
mod event_manager;
mod event_type;

//=== Public API ==========================================================

pub use bindings::{BindingId, BindingsManager, EventBinding};
pub use builtin::{KeyAction, KeyboardEvent, MouseAction, MouseEvent, WindowClosedEvent};
pub use event_manager::EventManager;
pub use event_type::EventType;

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt::Debug;

//=== Event Trait =========================================================

/// A typed message that can travel through the [`EventManager`].
///
/// Implementors only name their type; cloning and downcasting come from
/// the blanket [`EventClone`] impl, which requires `Clone`.
///
/// ```rust
/// use bindery::core::event::{Event, EventType};
///
/// #[derive(Debug, Clone)]
/// struct Explosion { radius: f32 }
///
/// impl Event for Explosion {
///     fn event_type(&self) -> EventType {
///         EventType::new("explosion")
///     }
/// }
///
/// let boxed: Box<dyn Event> = Box::new(Explosion { radius: 2.0 });
/// let copy = boxed.clone();
/// assert_eq!(copy.downcast_ref::<Explosion>().map(|e| e.radius), Some(2.0));
/// ```
pub trait Event: EventClone + Debug + 'static {
    /// Stable identifier of this event's kind.
    fn event_type(&self) -> EventType;
}

/// Object-safe cloning and `Any` access for events.
///
/// Implemented for every `Event + Clone`; do not implement by hand.
pub trait EventClone {
    /// Deep copy preserving the concrete event type.
    fn clone_event(&self) -> Box<dyn Event>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Event + Clone> EventClone for T {
    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn Event> {
    fn clone(&self) -> Self {
        (**self).clone_event()
    }
}

//--- Checked Downcasts ---------------------------------------------------

impl dyn Event {
    /// Returns `true` if the concrete event type is `T`.
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns the concrete event if it is a `T`.
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable variant of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: Event>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

//=== EventListener Trait =================================================

/// Receives every event injected into the managers it is registered with.
///
/// Listeners get all event types; check [`Event::event_type`] or use a
/// checked downcast before touching the payload.
///
/// Handlers take `&self` so a listener can be re-entered when it injects
/// from inside its own handler. Mutable state lives in `Cell`/`RefCell`
/// fields, and no borrow of them should be held across an injection.
pub trait EventListener {
    fn handle_event(&self, event: &dyn Event);
}

impl<F: Fn(&dyn Event)> EventListener for F {
    fn handle_event(&self, event: &dyn Event) {
        self(event)
    }
}

//=========================================================================
// Tests
//=========================================================================
