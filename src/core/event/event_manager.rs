//=========================================================================
// Event Manager
//=========================================================================
//
// Listener registry and synchronous cascade dispatch.
//
// Architecture:
// ```text
//   inject_event(E)              depth 0
//     ├─ snapshot listeners ──► L1.handle_event(&E), L2..., Ln...
//     └─ bindings.fire(E)  ──► [B1, B2]
//          ├─ dispatch(B1)       depth 1 (listeners, then B1's bindings)
//          └─ dispatch(B2)       depth 1
// ```
//
// Listeners are held weakly: registering one does not keep it alive.
// The listener list is snapshotted per event, so handlers may add or
// remove listeners while they run. Entries removed mid-dispatch are
// skipped; entries added mid-dispatch first see the next event.
//
// Handlers take `&self`, so a listener that injects from inside its
// handler is delivered the nested event like everyone else. Depth is
// tracked on the manager itself, so those nested injections count toward
// the same cascade limit as bindings.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, error, trace};

//=== Internal Dependencies ===============================================

use super::{BindingsManager, Event, EventListener, EventType};
use crate::core::config::EventConfig;
use crate::core::error::EngineError;

//=== ListenerEntry =======================================================

/// One registration in the listener list.
struct ListenerEntry {
    serial: u64,
    listener: Weak<dyn EventListener>,
}

impl ListenerEntry {
    fn addr(&self) -> *const () {
        self.listener.as_ptr() as *const ()
    }

    fn is_alive(&self) -> bool {
        self.listener.strong_count() > 0
    }
}

//=== TrailFrame ==========================================================

/// Pushes an event type onto the dispatch trail and pops it on drop,
/// including during unwinding out of a panicking handler.
struct TrailFrame<'a> {
    trail: &'a RefCell<Vec<EventType>>,
}

impl<'a> TrailFrame<'a> {
    fn enter(trail: &'a RefCell<Vec<EventType>>, event_type: EventType) -> Self {
        trail.borrow_mut().push(event_type);
        Self { trail }
    }
}

impl Drop for TrailFrame<'_> {
    fn drop(&mut self) {
        self.trail.borrow_mut().pop();
    }
}

//=== EventManager ========================================================

/// Delivers events to registered listeners and expands event bindings.
///
/// All operations take `&self`, so an `Rc<EventManager>` can be shared
/// with listeners that register, deregister or inject from inside
/// [`EventListener::handle_event`].
///
/// # Examples
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use bindery::core::EventConfig;
/// use bindery::core::event::{Event, EventBinding, EventManager, EventType};
///
/// #[derive(Debug, Clone)]
/// struct Ping;
/// impl Event for Ping {
///     fn event_type(&self) -> EventType { EventType::new("ping") }
/// }
///
/// #[derive(Debug, Clone)]
/// struct Pong;
/// impl Event for Pong {
///     fn event_type(&self) -> EventType { EventType::new("pong") }
/// }
///
/// let manager = EventManager::new(EventConfig::default());
/// manager.bindings().bind(EventBinding::new("ping", Pong)).unwrap();
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let listener = Rc::new(move |e: &dyn Event| {
///     sink.borrow_mut().push(e.event_type().to_string());
/// });
/// manager.add_listener(&listener).unwrap();
///
/// manager.inject(Ping).unwrap();
/// assert_eq!(*seen.borrow(), vec!["ping", "pong"]);
/// ```
pub struct EventManager {
    config: EventConfig,
    bindings: Rc<BindingsManager>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_serial: Cell<u64>,
    /// Bumped whenever entries leave the list.
    removals: Cell<u64>,
    trail: RefCell<Vec<EventType>>,
}

impl EventManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with its own empty binding table.
    pub fn new(config: EventConfig) -> Self {
        Self::with_bindings(config, Rc::new(BindingsManager::new()))
    }

    /// Creates a manager that consults an existing binding table.
    pub fn with_bindings(config: EventConfig, bindings: Rc<BindingsManager>) -> Self {
        Self {
            config,
            bindings,
            listeners: RefCell::new(Vec::new()),
            next_serial: Cell::new(0),
            removals: Cell::new(0),
            trail: RefCell::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// The binding table consulted after each event's listeners ran.
    pub fn bindings(&self) -> &Rc<BindingsManager> {
        &self.bindings
    }

    //--- Listener Registry ------------------------------------------------

    /// Registers a listener. Only a weak reference is kept.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateListener`] if it is already registered and
    /// [`EventConfig::allow_duplicate_listeners`] is off.
    pub fn add_listener<L>(&self, listener: &Rc<L>) -> Result<(), EngineError>
    where
        L: EventListener + 'static,
    {
        let listener: Rc<dyn EventListener> = listener.clone();
        self.add_weak_listener(Rc::downgrade(&listener))
    }

    /// Registers a listener from a weak handle.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidListener`] if the handle is already dead, and
    /// the same duplicate check as [`add_listener`](Self::add_listener).
    pub fn add_weak_listener(&self, listener: Weak<dyn EventListener>) -> Result<(), EngineError> {
        if listener.strong_count() == 0 {
            return Err(EngineError::InvalidListener);
        }

        let mut listeners = self.listeners.borrow_mut();
        self.prune(&mut listeners);

        let addr = listener.as_ptr() as *const ();
        if !self.config.allow_duplicate_listeners && listeners.iter().any(|e| e.addr() == addr) {
            return Err(EngineError::DuplicateListener);
        }

        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);
        listeners.push(ListenerEntry { serial, listener });

        debug!("Listener registered ({} total)", listeners.len());
        Ok(())
    }

    /// Removes every registration of `listener`. Returns `false` if none.
    pub fn remove_listener<L>(&self, listener: &Rc<L>) -> bool
    where
        L: EventListener + ?Sized + 'static,
    {
        let addr = Rc::as_ptr(listener) as *const ();
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|e| e.addr() != addr);
        let removed = listeners.len() < before;
        if removed {
            self.removals.set(self.removals.get() + 1);
        }

        self.prune(&mut listeners);
        if removed {
            debug!("Listener removed ({} remaining)", listeners.len());
        }
        removed
    }

    /// Returns `true` if `listener` is currently registered.
    pub fn has_listener<L>(&self, listener: &Rc<L>) -> bool
    where
        L: EventListener + ?Sized + 'static,
    {
        let addr = Rc::as_ptr(listener) as *const ();
        self.listeners
            .borrow()
            .iter()
            .any(|e| e.is_alive() && e.addr() == addr)
    }

    /// Number of live registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|e| e.is_alive())
            .count()
    }

    /// Drops every registration.
    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
        self.removals.set(self.removals.get() + 1);
    }

    //--- Injection --------------------------------------------------------

    /// Boxes `event` and injects it.
    pub fn inject<E: Event>(&self, event: E) -> Result<(), EngineError> {
        self.inject_event(Box::new(event))
    }

    /// Dispatches `event` and its whole binding cascade before returning.
    ///
    /// Listeners see the event in registration order, then each binding
    /// keyed on its type fires, in binding order, each clone being fully
    /// dispatched (listeners and its own bindings) before the next.
    ///
    /// # Errors
    ///
    /// [`EngineError::CascadeTooDeep`] if the cascade passes
    /// [`EventConfig::max_cascade_depth`]. The offending event is not
    /// delivered and no further bindings of the cascade fire; listener
    /// calls that already happened stand.
    pub fn inject_event(&self, event: Box<dyn Event>) -> Result<(), EngineError> {
        self.dispatch(event)
    }

    /// Current nesting depth (0 while idle).
    pub fn dispatch_depth(&self) -> usize {
        self.trail.borrow().len()
    }

    /// Returns `true` while an injection is running.
    pub fn is_dispatching(&self) -> bool {
        self.dispatch_depth() > 0
    }

    //--- Internal Helpers -------------------------------------------------

    fn dispatch(&self, event: Box<dyn Event>) -> Result<(), EngineError> {
        let event_type = event.event_type();

        let depth = self.trail.borrow().len();
        if depth > self.config.max_cascade_depth {
            let mut trail = self.trail.borrow().clone();
            trail.push(event_type);
            let err = EngineError::CascadeTooDeep {
                limit: self.config.max_cascade_depth,
                trail,
            };
            error!("{}", err);
            return Err(err);
        }

        let _frame = TrailFrame::enter(&self.trail, event_type.clone());
        trace!("Dispatching {} at depth {}", event_type, depth);

        self.deliver(event.as_ref());

        for bound in self.bindings.fire(&event_type) {
            self.dispatch(bound)?;
        }

        Ok(())
    }

    fn deliver(&self, event: &dyn Event) {
        let snapshot: Vec<(u64, Weak<dyn EventListener>)> = self
            .listeners
            .borrow()
            .iter()
            .map(|e| (e.serial, e.listener.clone()))
            .collect();

        // Serials are never reused, so the live set only needs rebuilding
        // after a handler removed something.
        let mut seen_removals = self.removals.get();
        let mut live: Option<HashSet<u64>> = None;

        for (serial, weak) in snapshot {
            if self.removals.get() != seen_removals {
                seen_removals = self.removals.get();
                live = Some(self.listeners.borrow().iter().map(|e| e.serial).collect());
            }

            if live.as_ref().is_some_and(|live| !live.contains(&serial)) {
                trace!("Skipping listener removed during dispatch");
                continue;
            }

            let Some(listener) = weak.upgrade() else {
                continue;
            };

            listener.handle_event(event);
        }
    }

    /// Drops entries whose listener has been dropped.
    fn prune(&self, listeners: &mut Vec<ListenerEntry>) {
        let before = listeners.len();
        listeners.retain(ListenerEntry::is_alive);
        if listeners.len() < before {
            self.removals.set(self.removals.get() + 1);
        }
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("config", &self.config)
            .field("listeners", &self.listener_count())
            .field("bindings", &self.bindings)
            .field("depth", &self.dispatch_depth())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
