//=========================================================================
// Core
//=========================================================================
//
// Everything that runs on the logic thread: the event core, input
// forwarding, the Root lifecycle and the fixed-rate loop driving them.
//
// Architecture:
// ```text
//   platform thread ──PlatformEvent──► EventCollector
//                                          │ frame: [InputEvent]
//                                          ▼
//   CoreLoop (logic thread @ TPS) ──► Root::process_input ──► EventManager
//                                 └─► frame hook (&Root, delta)
// ```
//
// The Root is created inside the logic thread. Only the user hooks
// cross the thread boundary, and they are required to be Send.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub(crate) mod platform_bridge;
mod root;
pub mod strings;

//=== Public API ==========================================================

pub use config::EventConfig;
pub use error::EngineError;
pub use root::Root;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{error, info};

//=== Internal Dependencies ===============================================

use event::WindowClosedEvent;
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== Hooks ===============================================================

/// Runs once on the logic thread, right after the Root is initialized.
pub(crate) type InitHook = Box<dyn FnOnce(&mut Root) + Send>;

/// Runs every tick after input was dispatched, with the tick's delta in
/// seconds.
pub(crate) type FrameHook = Box<dyn FnMut(&Root, f64) + Send>;

//=== CoreLoop ============================================================

pub(crate) struct CoreLoop {
    config: EventConfig,
    tps: f64,
    init_hook: Option<InitHook>,
    frame_hook: Option<FrameHook>,
}

impl CoreLoop {
    pub(crate) fn new(config: EventConfig, tps: f64) -> Self {
        Self {
            config,
            tps,
            init_hook: None,
            frame_hook: None,
        }
    }

    pub(crate) fn set_init_hook(&mut self, hook: InitHook) {
        self.init_hook = Some(hook);
    }

    pub(crate) fn set_frame_hook(&mut self, hook: FrameHook) {
        self.frame_hook = Some(hook);
    }

    /// Starts the logic thread. It stops after the platform sends
    /// `WindowClosed` or drops its sender.
    pub(crate) fn spawn(self, receiver: Receiver<PlatformEvent>) -> thread::JoinHandle<()> {
        thread::spawn(move || self.run(receiver))
    }

    fn run(mut self, receiver: Receiver<PlatformEvent>) {
        let mut root = Root::new(self.config);
        if let Err(e) = root.initialize() {
            error!("Root initialization failed: {}", e);
            return;
        }

        if let Some(init) = self.init_hook.take() {
            init(&mut root);
        }

        let tick = Duration::from_secs_f64(1.0 / self.tps);
        let mut collector = EventCollector::new(receiver);
        let mut last_tick = Instant::now();

        info!("Core loop running at {} TPS", self.tps);

        loop {
            let tick_start = Instant::now();

            //--- Input -------------------------------------------------------
            let control = collector.collect_frame();
            if let Err(e) = root.process_input(collector.frame()) {
                error!("Input dispatch failed: {}", e);
            }
            if control == TickControl::Exit {
                break;
            }

            //--- Frame hook --------------------------------------------------
            let delta = tick_start.duration_since(last_tick).as_secs_f64();
            last_tick = tick_start;
            if let Some(hook) = self.frame_hook.as_mut() {
                hook(&root, delta);
            }

            //--- Pacing ------------------------------------------------------
            let elapsed = tick_start.elapsed();
            if elapsed < tick {
                thread::sleep(tick - elapsed);
            }
        }

        if let Err(e) = root.inject(WindowClosedEvent) {
            error!("Shutdown event dispatch failed: {}", e);
        }
        root.deinitialize();

        info!("Core loop stopped");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{Event, EventBinding};
    use crate::core::input::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn recording_init(log: Arc<Mutex<Vec<String>>>) -> InitHook {
        Box::new(move |root: &mut Root| {
            root.attach_listener(move |e: &dyn Event| {
                log.lock().unwrap().push(e.event_type().to_string());
            })
            .unwrap();
        })
    }

    #[test]
    fn input_is_dispatched_and_shutdown_announced() {
        let (tx, rx) = unbounded();
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut core = CoreLoop::new(EventConfig::default(), 240.0);
        core.set_init_hook(recording_init(log.clone()));

        tx.send(PlatformEvent::Inputs {
            discrete: vec![InputEvent::KeyDown { key: KeyCode::Enter, modifiers: Modifiers::NONE }],
            continuous: vec![],
        })
        .unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        core.spawn(rx).join().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["keyboard", "window_closed"]);
    }

    #[test]
    fn bindings_set_up_in_init_apply_to_input() {
        let (tx, rx) = unbounded();
        let log = Arc::new(Mutex::new(Vec::new()));
        let recorder = recording_init(log.clone());

        let mut core = CoreLoop::new(EventConfig::default(), 240.0);
        core.set_init_hook(Box::new(move |root: &mut Root| {
            recorder(root);
            root.bind(EventBinding::new("mouse", WindowClosedEvent)).unwrap();
        }));

        tx.send(PlatformEvent::Inputs {
            discrete: vec![],
            continuous: vec![InputEvent::MouseMoved { x: 1.0, y: 1.0 }],
        })
        .unwrap();
        drop(tx);

        core.spawn(rx).join().unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["mouse", "window_closed", "window_closed"]
        );
    }

    #[test]
    fn frame_hook_runs_each_tick() {
        let (tx, rx) = unbounded();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();

        let mut core = CoreLoop::new(EventConfig::default(), 500.0);
        core.set_frame_hook(Box::new(move |root: &Root, delta: f64| {
            assert!(root.is_initialized());
            assert!(delta >= 0.0);
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let handle = core.spawn(rx);

        let deadline = Instant::now() + Duration::from_secs(5);
        while ticks.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        tx.send(PlatformEvent::WindowClosed).unwrap();
        handle.join().unwrap();

        assert!(ticks.load(Ordering::SeqCst) >= 3);
    }
}
