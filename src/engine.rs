//=========================================================================
// Engine
//=========================================================================
//
// Entry point for applications: configure, hook in, run.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init(hook)      runs on logic thread
//         ├─ with_channel_capacity() ├─ on_frame(hook)  runs every tick
//         ├─ with_event_config()     └─ run()           blocks until close
//         └─ with_title()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::bounded;
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::PlatformEvent;
use crate::core::{CoreLoop, EventConfig, Root};
use crate::platform::Platform;

//=== Defaults ============================================================

const DEFAULT_TPS: f64 = 60.0;
const DEFAULT_CHANNEL_CAPACITY: usize = 128;
const DEFAULT_TITLE: &str = "Bindery";

//=== EngineBuilder =======================================================

/// Configures an [`Engine`].
///
/// | Setting | Default |
/// |---|---|
/// | ticks per second | 60.0 |
/// | platform channel capacity | 128 messages |
/// | event config | [`EventConfig::default`] |
/// | window title | `"Bindery"` |
///
/// # Examples
///
/// ```no_run
/// use bindery::core::event::{EventBinding, WindowClosedEvent};
/// use bindery::EngineBuilder;
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .build()
///     .init(|root| {
///         root.bind(EventBinding::new("keyboard", WindowClosedEvent)).unwrap();
///     })
///     .run();
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    event_config: EventConfig,
    title: String,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            tps: DEFAULT_TPS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            event_config: EventConfig::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Logic thread update rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Messages the platform can queue before it blocks on the logic
    /// thread.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    pub fn with_event_config(mut self, config: EventConfig) -> Self {
        self.event_config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, cascade depth: {})",
            self.tps, self.channel_capacity, self.event_config.max_cascade_depth
        );

        Engine {
            core: CoreLoop::new(self.event_config, self.tps),
            channel_capacity: self.channel_capacity,
            title: self.title,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// A configured engine, ready to run.
///
/// The [`Root`] and everything registered on it live on the logic
/// thread. Hooks are therefore `Send` closures that run there: `init`
/// once after the root is initialized, `on_frame` every tick.
pub struct Engine {
    core: CoreLoop,
    channel_capacity: usize,
    title: String,
}

impl Engine {
    /// Sets the hook that registers listeners and bindings on startup.
    ///
    /// Listeners created here must be registered with
    /// [`Root::attach_listener`] to outlive the hook.
    pub fn init<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut Root) + Send + 'static,
    {
        self.core.set_init_hook(Box::new(hook));
        self
    }

    /// Sets the per-tick hook. It receives the seconds elapsed since the
    /// previous tick.
    pub fn on_frame<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Root, f64) + Send + 'static,
    {
        self.core.set_frame_hook(Box::new(hook));
        self
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Must be called from the main thread on platforms where winit
    /// requires it.
    pub fn run(self) {
        let (sender, receiver) = bounded::<PlatformEvent>(self.channel_capacity);

        let core_handle = self.core.spawn(receiver);
        info!("Logic thread started");

        if let Err(e) = Platform::new(self.title, sender).run() {
            error!("Platform error: {}", e);
        }

        match core_handle.join() {
            Ok(()) => info!("Engine shut down"),
            Err(e) => error!("Logic thread panicked: {:?}", e),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
