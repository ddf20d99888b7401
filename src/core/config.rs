//=========================================================================
// Event Configuration
//=========================================================================
//
// Tunables for the event core: cascade depth limit and listener
// duplicate policy. Built fluently, the same way EngineBuilder is.
//
//=========================================================================

//=== EventConfig =========================================================

/// Configuration for an [`EventManager`](crate::core::event::EventManager).
///
/// # Default Values
///
/// - **max_cascade_depth**: 64
/// - **allow_duplicate_listeners**: false
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventConfig {
    /// Deepest binding expansion allowed below a top-level injection.
    ///
    /// The injected event is depth 0; each bound follow-up adds one.
    pub max_cascade_depth: usize,

    /// Whether the same listener may be registered more than once.
    pub allow_duplicate_listeners: bool,
}

impl EventConfig {
    pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 64;

    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            max_cascade_depth: Self::DEFAULT_MAX_CASCADE_DEPTH,
            allow_duplicate_listeners: false,
        }
    }

    /// Sets the maximum binding cascade depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth == 0`.
    pub fn with_max_cascade_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Cascade depth must be positive");
        self.max_cascade_depth = depth;
        self
    }

    /// Allows or rejects registering the same listener twice.
    pub fn with_duplicate_listeners(mut self, allow: bool) -> Self {
        self.allow_duplicate_listeners = allow;
        self
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
