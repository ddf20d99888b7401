//=========================================================================
// Event Collector
//=========================================================================
//
// Logic-side end of the platform channel. Once per tick it drains what
// the platform sent and flattens it into one ordered input frame.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → frame: Vec<InputEvent>
//                                             └► TickControl
//
// A single tick drains at most MAX_MESSAGES_PER_TICK messages; the rest
// stay queued for the next tick. An idle tick sleeps briefly.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::event::InputEvent;

//=== Constants ===========================================================

const MAX_MESSAGES_PER_TICK: usize = 100;
const IDLE_SLEEP: Duration = Duration::from_millis(10);

//=== TickControl =========================================================

/// Whether the core loop keeps ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    frame: Vec<InputEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            frame: Vec::with_capacity(32),
        }
    }

    /// Replaces the current frame with whatever the platform sent since
    /// the previous call.
    ///
    /// Within a message, discrete input precedes continuous input.
    /// Returns [`TickControl::Exit`] on `WindowClosed` or when the
    /// platform side hung up; input gathered before that is kept.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.frame.clear();
        let mut received = 0;

        while received < MAX_MESSAGES_PER_TICK {
            let message = match self.receiver.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Platform channel disconnected");
                    return TickControl::Exit;
                }
            };
            received += 1;

            match message {
                PlatformEvent::Inputs { discrete, continuous } => {
                    self.frame.extend(discrete);
                    self.frame.extend(continuous);
                }
                PlatformEvent::WindowClosed => return TickControl::Exit,
            }
        }

        if received == MAX_MESSAGES_PER_TICK {
            warn!("Platform backlog: {} messages this tick, deferring the rest", received);
        } else if received == 0 {
            thread::sleep(IDLE_SLEEP);
        }

        TickControl::Continue
    }

    /// Input collected by the last [`collect_frame`](Self::collect_frame).
    pub(crate) fn frame(&self) -> &[InputEvent] {
        &self.frame
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
