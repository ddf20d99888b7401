//=========================================================================
// Event Bindings
//=========================================================================
//
// Declarative rules that turn a trigger event type into a follow-up
// event. Each rule owns a prototype event and hands out clones of it.
//
// Architecture:
//   trigger type → Vec<(BindingId, EventBinding)> (insertion order)
//
// The table sits behind a RefCell so rules can be added or removed while
// a cascade is running. `fire()` clones every matching prototype up
// front, so the set of follow-ups for one trigger is fixed at that point.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{Event, EventType};
use crate::core::error::EngineError;

//=== BindingId ===========================================================

/// Handle identifying a registered binding, used to unbind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== EventBinding ========================================================

/// Rule: whenever `trigger` is dispatched, dispatch a clone of `prototype`.
pub struct EventBinding {
    trigger: EventType,
    prototype: Box<dyn Event>,
}

impl EventBinding {
    /// Creates a binding from a trigger type and a prototype event.
    pub fn new(trigger: impl Into<EventType>, prototype: impl Event) -> Self {
        Self::from_boxed(trigger, Box::new(prototype))
    }

    /// Creates a binding from an already boxed prototype.
    pub fn from_boxed(trigger: impl Into<EventType>, prototype: Box<dyn Event>) -> Self {
        Self {
            trigger: trigger.into(),
            prototype,
        }
    }

    /// The event type that fires this binding.
    pub fn trigger(&self) -> &EventType {
        &self.trigger
    }

    /// Read-only view of the prototype.
    pub fn prototype(&self) -> &dyn Event {
        self.prototype.as_ref()
    }

    /// Type of the event this binding produces.
    pub fn bound_type(&self) -> EventType {
        self.prototype.event_type()
    }

    /// Produces a fresh, independently owned copy of the prototype.
    pub fn fire(&self) -> Box<dyn Event> {
        let event = self.prototype.clone_event();
        debug_assert_eq!(
            event.event_type(),
            self.prototype.event_type(),
            "clone_event changed the event type"
        );
        event
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("trigger", &self.trigger)
            .field("prototype", &self.prototype)
            .finish()
    }
}

//=== BindingsManager =====================================================

/// Table of event bindings keyed by trigger type.
///
/// Rules sharing a trigger keep their registration order, which is the
/// order their cascades run in.
pub struct BindingsManager {
    table: RefCell<HashMap<EventType, Vec<(BindingId, EventBinding)>>>,
    next_id: Cell<u64>,
}

impl BindingsManager {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            table: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a binding and returns its handle.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidBinding`] if the trigger name is empty or the
    /// prototype has the trigger's own type.
    pub fn bind(&self, binding: EventBinding) -> Result<BindingId, EngineError> {
        if binding.trigger.is_empty() {
            return Err(EngineError::InvalidBinding(
                "trigger event type is empty".to_string(),
            ));
        }

        let bound_type = binding.bound_type();
        if bound_type == binding.trigger {
            return Err(EngineError::InvalidBinding(format!(
                "'{}' is bound to itself",
                bound_type
            )));
        }

        let id = BindingId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        debug!("Bound {} -> {} as {}", binding.trigger, bound_type, id);

        self.table
            .borrow_mut()
            .entry(binding.trigger.clone())
            .or_default()
            .push((id, binding));

        Ok(id)
    }

    /// Removes one binding. Returns `false` if the handle is unknown.
    pub fn unbind(&self, id: BindingId) -> bool {
        let mut table = self.table.borrow_mut();

        let Some(trigger) = table
            .iter()
            .find(|(_, rules)| rules.iter().any(|(rule_id, _)| *rule_id == id))
            .map(|(trigger, _)| trigger.clone())
        else {
            return false;
        };

        if let Some(rules) = table.get_mut(&trigger) {
            rules.retain(|(rule_id, _)| *rule_id != id);
            if rules.is_empty() {
                table.remove(&trigger);
            }
        }

        debug!("Unbound {} (trigger {})", id, trigger);
        true
    }

    /// Removes every binding for `trigger`, returning how many were removed.
    pub fn unbind_all(&self, trigger: &EventType) -> usize {
        let removed = self
            .table
            .borrow_mut()
            .remove(trigger)
            .map_or(0, |rules| rules.len());

        if removed > 0 {
            debug!("Unbound {} binding(s) for {}", removed, trigger);
        }
        removed
    }

    /// Removes all bindings.
    pub fn clear(&self) {
        self.table.borrow_mut().clear();
    }

    //--- Lookup -----------------------------------------------------------

    /// Clones the prototype of every binding for `trigger`, in order.
    pub fn fire(&self, trigger: &EventType) -> Vec<Box<dyn Event>> {
        let table = self.table.borrow();
        let Some(rules) = table.get(trigger) else {
            return Vec::new();
        };

        trace!("{} binding(s) fire for {}", rules.len(), trigger);
        rules.iter().map(|(_, binding)| binding.fire()).collect()
    }

    /// Handles of the bindings for `trigger`, in registration order.
    pub fn bindings_for(&self, trigger: &EventType) -> Vec<BindingId> {
        self.table
            .borrow()
            .get(trigger)
            .map(|rules| rules.iter().map(|(id, _)| *id).collect())
            .unwrap_or_default()
    }

    /// Returns `true` if at least one binding uses `trigger`.
    pub fn has_bindings(&self, trigger: &EventType) -> bool {
        self.table.borrow().contains_key(trigger)
    }

    /// Total number of bindings.
    pub fn len(&self) -> usize {
        self.table.borrow().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }
}

impl Default for BindingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.borrow();
        let mut triggers: Vec<_> = table
            .iter()
            .map(|(trigger, rules)| (trigger.as_str().to_string(), rules.len()))
            .collect();
        triggers.sort();

        f.debug_struct("BindingsManager")
            .field("triggers", &triggers)
            .field("next_id", &self.next_id.get())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Bound {
        data: i32,
    }

    impl Event for Bound {
        fn event_type(&self) -> EventType {
            EventType::new("bound")
        }
    }

    #[derive(Debug, Clone)]
    struct Named(&'static str);

    impl Event for Named {
        fn event_type(&self) -> EventType {
            EventType::new(self.0)
        }
    }

    fn data_of(event: &dyn Event) -> Option<i32> {
        event.downcast_ref::<Bound>().map(|b| b.data)
    }

    #[test]
    fn new_manager_is_empty() {
        let manager = BindingsManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
        assert!(manager.fire(&EventType::new("trigger")).is_empty());
    }

    #[test]
    fn fire_returns_clones_in_registration_order() {
        let manager = BindingsManager::new();
        manager.bind(EventBinding::new("trigger", Bound { data: 1 })).unwrap();
        manager.bind(EventBinding::new("trigger", Bound { data: 2 })).unwrap();
        manager.bind(EventBinding::new("other", Bound { data: 3 })).unwrap();

        let fired = manager.fire(&EventType::new("trigger"));
        let data: Vec<_> = fired.iter().filter_map(|e| data_of(e.as_ref())).collect();
        assert_eq!(data, vec![1, 2]);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn fired_events_do_not_alias_prototype() {
        let manager = BindingsManager::new();
        manager.bind(EventBinding::new("trigger", Bound { data: 42 })).unwrap();

        let mut first = manager.fire(&EventType::new("trigger"));
        if let Some(bound) = first[0].downcast_mut::<Bound>() {
            bound.data = 7;
        }

        let second = manager.fire(&EventType::new("trigger"));
        assert_eq!(data_of(second[0].as_ref()), Some(42));
        assert_eq!(data_of(first[0].as_ref()), Some(7));
    }

    #[test]
    fn ids_are_monotonic() {
        let manager = BindingsManager::new();
        let a = manager.bind(EventBinding::new("t", Bound { data: 0 })).unwrap();
        let b = manager.bind(EventBinding::new("t", Bound { data: 0 })).unwrap();
        assert_eq!(a.value(), 1);
        assert_eq!(b.value(), 2);
        assert_eq!(manager.bindings_for(&EventType::new("t")), vec![a, b]);
    }

    #[test]
    fn unbind_removes_only_that_rule() {
        let manager = BindingsManager::new();
        let a = manager.bind(EventBinding::new("t", Bound { data: 1 })).unwrap();
        let b = manager.bind(EventBinding::new("t", Bound { data: 2 })).unwrap();

        assert!(manager.unbind(a));
        assert!(!manager.unbind(a));
        assert_eq!(manager.bindings_for(&EventType::new("t")), vec![b]);

        assert!(manager.unbind(b));
        assert!(!manager.has_bindings(&EventType::new("t")));
        assert!(manager.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_unbind() {
        let manager = BindingsManager::new();
        let a = manager.bind(EventBinding::new("t", Bound { data: 1 })).unwrap();
        manager.unbind(a);
        let b = manager.bind(EventBinding::new("t", Bound { data: 1 })).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unbind_all_counts_removed() {
        let manager = BindingsManager::new();
        manager.bind(EventBinding::new("t", Bound { data: 1 })).unwrap();
        manager.bind(EventBinding::new("t", Bound { data: 2 })).unwrap();
        manager.bind(EventBinding::new("u", Bound { data: 3 })).unwrap();

        assert_eq!(manager.unbind_all(&EventType::new("t")), 2);
        assert_eq!(manager.unbind_all(&EventType::new("t")), 0);
        assert_eq!(manager.len(), 1);

        manager.clear();
        assert!(manager.is_empty());
    }

    #[test]
    fn rejects_empty_trigger() {
        let manager = BindingsManager::new();
        let result = manager.bind(EventBinding::new("", Bound { data: 0 }));
        assert!(matches!(result, Err(EngineError::InvalidBinding(_))));
        assert!(manager.is_empty());
    }

    #[test]
    fn rejects_self_binding() {
        let manager = BindingsManager::new();
        let result = manager.bind(EventBinding::new("loop", Named("loop")));
        assert!(matches!(result, Err(EngineError::InvalidBinding(_))));
    }

    #[test]
    fn binding_exposes_trigger_and_bound_type() {
        let binding = EventBinding::new("trigger", Bound { data: 5 });
        assert_eq!(binding.trigger(), &EventType::new("trigger"));
        assert_eq!(binding.bound_type(), EventType::new("bound"));
        assert_eq!(data_of(binding.prototype()), Some(5));
    }
}
