//=========================================================================
// String Manager
//=========================================================================
//
// Interning table for names used across the engine (event types first
// of all). Each distinct name gets a small numeric id, starting at 1,
// and a single shared allocation.
//
// Architecture:
//   name ──► HashMap<Arc<str>, u32> ──► id
//   id   ──► Vec<Arc<str>> (id - 1)  ──► name
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::event::EventType;

//=== StringManager =======================================================

/// Registry of interned names.
#[derive(Debug, Default)]
pub struct StringManager {
    ids: HashMap<Arc<str>, u32>,
    names: Vec<Arc<str>>,
}

impl StringManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, returning its id. Registering twice returns the
    /// id handed out the first time.
    pub fn add(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }

        let shared: Arc<str> = Arc::from(name);
        self.names.push(shared.clone());
        let id = self.names.len() as u32;
        self.ids.insert(shared, id);

        trace!("Interned '{}' as {}", name, id);
        id
    }

    /// Registers `name` if needed and returns it as an [`EventType`]
    /// sharing the interned allocation.
    pub fn intern(&mut self, name: &str) -> EventType {
        let id = self.add(name);
        EventType::from_shared(self.names[(id - 1) as usize].clone())
    }

    pub fn get_id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn get(&self, id: u32) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.names.get(index).map(|name| name.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Forgets every name. Ids start again at 1.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.names.clear();
    }
}

//=========================================================================
// Tests
//=========================================================================
