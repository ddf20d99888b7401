//=========================================================================
// Platform
//=========================================================================
//
// winit window and input collection on the main thread.
//
// Architecture:
// ```text
//  main thread                                   logic thread
//  ┌─────────────────────────────┐
//  │ winit EventLoop             │
//  │   ↓ WindowEvent             │
//  │ InputProcessor  (→ InputEvent, sticky modifiers)
//  │   ↓                         │
//  │ InputBuffer     (per redraw)│
//  │   ↓ RedrawRequested         │
//  │ Sender<PlatformEvent> ──────┼──────────►  CoreLoop
//  └─────────────────────────────┘
// ```
//
// RedrawRequested is the batching boundary. Empty batches are not sent.
// A dead logic thread does not stop the window; input is dropped with
// a warning until the user closes it.
//
//=========================================================================

//=== Module Declarations =================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

pub(crate) struct Platform {
    window: Option<Window>,
    title: String,
    processor: InputProcessor,
    buffer: InputBuffer,
    sender: Sender<PlatformEvent>,
}

impl Platform {
    pub(crate) fn new(title: impl Into<String>, sender: Sender<PlatformEvent>) -> Self {
        Self {
            window: None,
            title: title.into(),
            processor: InputProcessor::new(),
            buffer: InputBuffer::new(),
            sender,
        }
    }

    /// Runs the winit event loop on the calling thread until the window
    /// closes.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        debug!(target: "platform", "Entering event loop");
        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Channel ----------------------------------------------------------

    fn flush(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };

        let message = PlatformEvent::Inputs { discrete, continuous };
        let count = message.input_count();
        trace!(target: "platform::input", "Sending {} input events", count);

        if self.sender.send(message).is_err() {
            warn!(target: "platform::input", "Logic thread gone, dropped {} input events", count);
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.flush();
        if self.sender.send(PlatformEvent::WindowClosed).is_err() {
            debug!(target: "platform", "Logic thread already stopped");
        }
        event_loop.exit();
    }

    #[cfg(test)]
    fn has_window(&self) -> bool {
        self.window.is_some()
    }
}

//=== winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                info!(target: "platform", "Window created ({}x{})", size.width, size.height);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Close requested");
                self.close(event_loop);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.processor.set_modifiers(modifiers.state());
                trace!(target: "platform::input", "Modifiers now {:?}", self.processor.modifiers());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = self.processor.key(&event) {
                    self.buffer.push(input);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let input = self.processor.button(button, state);
                self.buffer.push(input);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let input = self.processor.cursor(position.x, position.y);
                self.buffer.push(input);
            }
            WindowEvent::RedrawRequested => {
                self.flush();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    fn key(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    #[test]
    fn window_is_created_lazily() {
        let (tx, _rx) = unbounded();
        let platform = Platform::new("test", tx);
        assert!(!platform.has_window());
    }

    #[test]
    fn flush_without_input_sends_nothing() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new("test", tx);

        platform.flush();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_one_batch() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new("test", tx);

        platform.buffer.push(key(KeyCode::KeyA));
        platform.buffer.push(InputEvent::MouseMoved { x: 5.0, y: 6.0 });
        platform.flush();
        platform.flush();

        assert_eq!(
            rx.try_recv().unwrap(),
            PlatformEvent::Inputs {
                discrete: vec![key(KeyCode::KeyA)],
                continuous: vec![InputEvent::MouseMoved { x: 5.0, y: 6.0 }],
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_survives_disconnected_logic_thread() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new("test", tx);
        drop(rx);

        platform.buffer.push(key(KeyCode::Space));
        platform.flush();

        assert!(platform.buffer.is_empty());
    }
}
