//=========================================================================
// Event Type
//=========================================================================
//
// String identifier naming an event kind. Equality is by value, so an
// identifier built from a literal matches one handed out by the string
// manager. Cloning shares the underlying allocation.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;

//=== EventType ===========================================================

/// Value-comparable name of an event kind (e.g. `"keyboard"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Arc<str>);

impl EventType {
    /// Creates an event type from any string-like name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Wraps an already shared name without copying it.
    pub(crate) fn from_shared(name: Arc<str>) -> Self {
        Self(name)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty name, which no binding accepts.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if both identifiers share one allocation.
    pub fn shares_storage(&self, other: &EventType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_is_by_value() {
        let a = EventType::new("keyboard");
        let b = EventType::from(String::from("keyboard"));
        assert_eq!(a, b);
        assert!(!a.shares_storage(&b));
    }

    #[test]
    fn compares_with_str() {
        let t = EventType::from("mouse");
        assert!(t == "mouse");
        assert_eq!(t.as_str(), "mouse");
        assert_eq!(t.to_string(), "mouse");
    }

    #[test]
    fn clones_share_storage() {
        let a = EventType::new("window_closed");
        let b = a.clone();
        assert!(a.shares_storage(&b));
    }

    #[test]
    fn hashes_by_value() {
        let mut set = HashSet::new();
        set.insert(EventType::new("a"));
        assert!(set.contains(&EventType::from("a")));
        assert!(!set.contains(&EventType::from("b")));
    }

    #[test]
    fn empty_name_is_detected() {
        assert!(EventType::new("").is_empty());
        assert!(!EventType::new("x").is_empty());
    }
}
