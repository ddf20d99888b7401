//=========================================================================
// Engine Errors
//=========================================================================
//
// Error type shared by the event core and the engine root.
//
// Unmatched event types are not errors; dispatch simply ends. Everything
// here is either a precondition failure at registration time or a cascade
// that had to be cut short.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::event::EventType;

//=== EngineError =========================================================

/// Errors reported by the event core and [`Root`](crate::core::Root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The root has not been initialized (or was deinitialized).
    NotInitialized,

    /// `initialize()` was called on an already running root.
    AlreadyInitialized,

    /// The listener is already registered and duplicates are disabled.
    DuplicateListener,

    /// The listener handle no longer points at a live listener.
    InvalidListener,

    /// A binding was rejected at registration.
    InvalidBinding(String),

    /// A binding cascade went deeper than the configured limit.
    ///
    /// `trail` holds the event types from the top-level injection down to
    /// the event that was refused.
    CascadeTooDeep { limit: usize, trail: Vec<EventType> },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "Engine root is not initialized"),
            Self::AlreadyInitialized => write!(f, "Engine root is already initialized"),
            Self::DuplicateListener => write!(f, "Listener is already registered"),
            Self::InvalidListener => write!(f, "Listener handle is no longer alive"),
            Self::InvalidBinding(reason) => write!(f, "Invalid event binding: {}", reason),
            Self::CascadeTooDeep { limit, trail } => {
                write!(f, "Event cascade exceeded depth limit {}: ", limit)?;
                for (i, event_type) in trail.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{}", event_type)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for EngineError {}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn cascade_error_lists_trail() {
        let err = EngineError::CascadeTooDeep {
            limit: 2,
            trail: vec![EventType::new("a"), EventType::new("b"), EventType::new("a")],
        };
        assert_eq!(err.to_string(), "Event cascade exceeded depth limit 2: a -> b -> a");
    }

    #[test]
    fn invalid_binding_includes_reason() {
        let err = EngineError::InvalidBinding("empty trigger".to_string());
        assert!(err.to_string().contains("empty trigger"));
    }
}
