//! Persistent key-value storage
//!
//! The game persists two things: the high score and the player's settings.
//! Both go through [`KeyValueStore`], backed by LocalStorage in the browser
//! and by [`MemoryStore`] everywhere else.

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

use std::collections::HashMap;

use crate::error::StorageError;

/// String key-value store
pub trait KeyValueStore {
    /// Read a value, `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("car_dodger_high"), None);
        store.set("car_dodger_high", "42").unwrap();
        assert_eq!(store.get("car_dodger_high").as_deref(), Some("42"));
    }

    #[test]
    fn test_memory_store_overwrite() {
        let mut store = MemoryStore::new().with("k", "a");
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("b"));
    }
}
