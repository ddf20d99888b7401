//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages sent from the platform thread to the logic thread, and the
// errors the platform layer can report back to the engine.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::event::InputEvent;

//=== PlatformEvent =======================================================

/// One message over the platform → logic channel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// Input gathered between two redraws. Discrete input keeps its
    /// order; continuous input holds at most one entry per kind.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// The user asked to close the window.
    WindowClosed,
}

impl PlatformEvent {
    /// Number of raw input events carried by this message.
    pub(crate) fn input_count(&self) -> usize {
        match self {
            Self::Inputs { discrete, continuous } => discrete.len() + continuous.len(),
            Self::WindowClosed => 0,
        }
    }
}

//=== PlatformError =======================================================

/// Failure to create or drive the window event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformError {
    EventLoopCreation(String),
    EventLoopExecution(String),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventLoopCreation(reason) => write!(f, "Could not create event loop: {}", reason),
            Self::EventLoopExecution(reason) => write!(f, "Event loop failed: {}", reason),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================
