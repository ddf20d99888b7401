//=========================================================================
// Root
//=========================================================================
//
// Owns the engine-wide managers for the lifetime between initialize()
// and deinitialize().
//
// Architecture:
// ```text
//   Root
//     ├─ StringManager          (lives as long as the Root)
//     ├─ InputManager           (state reset on deinitialize)
//     ├─ attached listeners     (strong refs, released on deinitialize)
//     └─ Option<Rc<EventManager>>
//           └─ Rc<BindingsManager>
// ```
//
// The event core is Rc-based and stays on the thread that created the
// Root. Tests build one Root (or one bare EventManager) per case.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::config::EventConfig;
use super::error::EngineError;
use super::event::{builtin, BindingId, BindingsManager, Event, EventBinding, EventListener, EventManager};
use super::input::{InputEvent, InputManager};
use super::strings::StringManager;

//=== Root ================================================================

/// Engine lifecycle owner and facade over the event core.
///
/// # Examples
///
/// ```rust
/// use bindery::core::{EventConfig, Root};
/// use bindery::core::event::WindowClosedEvent;
///
/// let mut root = Root::new(EventConfig::default());
/// root.initialize().unwrap();
/// root.inject(WindowClosedEvent).unwrap();
/// root.deinitialize();
///
/// assert!(root.inject(WindowClosedEvent).is_err());
/// ```
pub struct Root {
    config: EventConfig,
    strings: StringManager,
    input: InputManager,
    attached: Vec<Rc<dyn EventListener>>,
    events: Option<Rc<EventManager>>,
}

impl Root {
    //--- Construction -----------------------------------------------------

    /// Creates an uninitialized root.
    pub fn new(config: EventConfig) -> Self {
        Self {
            config,
            strings: StringManager::new(),
            input: InputManager::new(),
            attached: Vec::new(),
            events: None,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Creates fresh event and binding managers and registers the
    /// built-in event names.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyInitialized`] if called twice without
    /// [`deinitialize`](Self::deinitialize) in between.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.events.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }

        builtin::register_names(&mut self.strings);
        self.events = Some(Rc::new(EventManager::new(self.config)));

        info!(
            "Root initialized (cascade depth limit: {}, duplicate listeners: {})",
            self.config.max_cascade_depth, self.config.allow_duplicate_listeners
        );
        Ok(())
    }

    /// Drops the managers, input state and interned names.
    pub fn deinitialize(&mut self) {
        let Some(events) = self.events.take() else {
            debug!("Root deinitialize called while not initialized");
            return;
        };

        events.clear_listeners();
        events.bindings().clear();
        self.attached.clear();
        self.input.reset();
        self.strings.clear();

        info!("Root deinitialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.events.is_some()
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// The event manager, while initialized.
    pub fn events(&self) -> Result<&Rc<EventManager>, EngineError> {
        self.events.as_ref().ok_or(EngineError::NotInitialized)
    }

    /// The binding table, while initialized.
    pub fn bindings(&self) -> Result<&Rc<BindingsManager>, EngineError> {
        self.events().map(|events| events.bindings())
    }

    pub fn strings(&self) -> &StringManager {
        &self.strings
    }

    pub fn strings_mut(&mut self) -> &mut StringManager {
        &mut self.strings
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    //--- Event Facade -----------------------------------------------------

    /// See [`EventManager::add_listener`].
    pub fn add_listener<L>(&self, listener: &Rc<L>) -> Result<(), EngineError>
    where
        L: EventListener + 'static,
    {
        self.events()?.add_listener(listener)
    }

    /// Registers `listener` and keeps it alive until
    /// [`deinitialize`](Self::deinitialize).
    ///
    /// The event manager only holds weak handles, so this is the way to
    /// register a listener whose owner would otherwise go out of scope,
    /// such as one created inside an engine init hook.
    pub fn attach_listener<L>(&mut self, listener: L) -> Result<Rc<L>, EngineError>
    where
        L: EventListener + 'static,
    {
        let listener = Rc::new(listener);
        self.events()?.add_listener(&listener)?;
        self.attached.push(listener.clone());
        Ok(listener)
    }

    /// See [`EventManager::remove_listener`]. `false` while uninitialized.
    pub fn remove_listener<L>(&self, listener: &Rc<L>) -> bool
    where
        L: EventListener + ?Sized + 'static,
    {
        self.events
            .as_ref()
            .is_some_and(|events| events.remove_listener(listener))
    }

    /// Registers a binding. Names missing from the string manager are
    /// logged but accepted.
    pub fn bind(&self, binding: EventBinding) -> Result<BindingId, EngineError> {
        let bindings = self.bindings()?;

        for name in [binding.trigger().clone(), binding.bound_type()] {
            if !self.strings.has(name.as_str()) {
                warn!("Binding uses unregistered event type '{}'", name);
            }
        }

        bindings.bind(binding)
    }

    /// See [`BindingsManager::unbind`]. `false` while uninitialized.
    pub fn unbind(&self, id: BindingId) -> bool {
        self.bindings().is_ok_and(|bindings| bindings.unbind(id))
    }

    /// See [`EventManager::inject`].
    pub fn inject<E: Event>(&self, event: E) -> Result<(), EngineError> {
        self.events()?.inject(event)
    }

    /// See [`EventManager::inject_event`].
    pub fn inject_event(&self, event: Box<dyn Event>) -> Result<(), EngineError> {
        self.events()?.inject_event(event)
    }

    /// Forwards one frame of raw input through the [`InputManager`].
    pub fn process_input<'a, I>(&mut self, inputs: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = &'a InputEvent>,
    {
        let events = self.events.as_ref().ok_or(EngineError::NotInitialized)?;
        self.input.process_frame(inputs, events)
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .field("strings", &self.strings.len())
            .field("attached", &self.attached.len())
            .finish()
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new(EventConfig::default())
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use crate::core::event::{EventType, KeyboardEvent, WindowClosedEvent};
    use crate::core::input::{KeyCode, Modifiers};

    fn initialized() -> Root {
        let mut root = Root::default();
        root.initialize().unwrap();
        root
    }

    fn type_log(root: &Root) -> (Rc<RefCell<Vec<EventType>>>, Rc<impl Fn(&dyn Event)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let listener = Rc::new(move |e: &dyn Event| {
            sink.borrow_mut().push(e.event_type());
        });
        root.add_listener(&listener).unwrap();
        (log, listener)
    }

    #[test]
    fn uninitialized_root_refuses_event_operations() {
        let root = Root::default();
        assert!(!root.is_initialized());
        assert_eq!(root.events().err(), Some(EngineError::NotInitialized));
        assert_eq!(root.inject(WindowClosedEvent), Err(EngineError::NotInitialized));
        assert_eq!(
            root.bind(EventBinding::new("keyboard", WindowClosedEvent)),
            Err(EngineError::NotInitialized)
        );
    }

    #[test]
    fn unbind_after_deinitialize_is_false() {
        let mut root = initialized();
        let id = root.bind(EventBinding::new("keyboard", WindowClosedEvent)).unwrap();
        root.deinitialize();
        assert!(!root.unbind(id));
    }

    #[test]
    fn initialize_twice_fails() {
        let mut root = initialized();
        assert_eq!(root.initialize(), Err(EngineError::AlreadyInitialized));
    }

    #[test]
    fn initialize_registers_builtin_names() {
        let root = initialized();
        assert!(root.strings().has(builtin::KEYBOARD_EVENT));
        assert!(root.strings().has(builtin::MOUSE_EVENT));
        assert!(root.strings().has(builtin::WINDOW_CLOSED_EVENT));
    }

    #[test]
    fn deinitialize_tears_everything_down() {
        let mut root = initialized();
        let (log, listener) = type_log(&root);
        root.bind(EventBinding::new("keyboard", WindowClosedEvent)).unwrap();

        root.deinitialize();
        assert!(!root.is_initialized());
        assert!(root.strings().is_empty());
        assert!(!root.remove_listener(&listener));

        root.deinitialize();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn reinitialize_starts_clean() {
        let mut root = initialized();
        let (log, _listener) = type_log(&root);
        root.bind(EventBinding::new("keyboard", WindowClosedEvent)).unwrap();

        root.deinitialize();
        root.initialize().unwrap();

        assert_eq!(root.events().unwrap().listener_count(), 0);
        assert!(root.bindings().unwrap().is_empty());

        root.inject(KeyboardEvent::pressed(KeyCode::KeyA, Modifiers::NONE)).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn bind_and_unbind_through_root() {
        let root = initialized();
        let (log, _listener) = type_log(&root);

        let id = root.bind(EventBinding::new("keyboard", WindowClosedEvent)).unwrap();
        root.inject(KeyboardEvent::pressed(KeyCode::Escape, Modifiers::NONE)).unwrap();
        assert_eq!(*log.borrow(), vec![EventType::new("keyboard"), EventType::new("window_closed")]);

        assert!(root.unbind(id));
        log.borrow_mut().clear();
        root.inject(KeyboardEvent::pressed(KeyCode::Escape, Modifiers::NONE)).unwrap();
        assert_eq!(*log.borrow(), vec![EventType::new("keyboard")]);
    }

    #[test]
    fn attached_listener_outlives_its_scope() {
        let mut root = initialized();
        let seen = Rc::new(Cell::new(0));
        {
            let sink = seen.clone();
            root.attach_listener(move |_: &dyn Event| sink.set(sink.get() + 1))
                .unwrap();
        }

        root.inject(WindowClosedEvent).unwrap();
        assert_eq!(seen.get(), 1);

        root.deinitialize();
        root.initialize().unwrap();
        root.inject(WindowClosedEvent).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn attach_requires_initialization() {
        let mut root = Root::default();
        assert!(matches!(
            root.attach_listener(|_: &dyn Event| {}),
            Err(EngineError::NotInitialized)
        ));
    }

    #[test]
    fn bind_accepts_unregistered_names() {
        let root = initialized();
        assert!(root.bind(EventBinding::new("never_registered", WindowClosedEvent)).is_ok());
    }

    #[test]
    fn process_input_injects_and_tracks_state() {
        let mut root = initialized();
        let (log, _listener) = type_log(&root);

        let frame = [InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::NONE }];
        root.process_input(&frame).unwrap();

        assert_eq!(*log.borrow(), vec![EventType::new("keyboard")]);
        assert!(root.input().is_key_down(KeyCode::Space));
    }

    #[test]
    fn process_input_requires_initialization() {
        let mut root = Root::default();
        let frame = [InputEvent::Unidentified];
        assert_eq!(root.process_input(&frame), Err(EngineError::NotInitialized));
    }
}
