//! Per-submitter variable storage backing `{{var}}` interpolation and the
//! memory capability.

use std::collections::HashMap;
use std::sync::Mutex;

/// Key-value storage scoped by submitter.
///
/// The memory capability writes through this trait and parameter
/// interpolation reads from it, so anything a submitter asks to remember
/// becomes available to later invocations.
pub trait VariableStore: Send + Sync {
    fn get(&self, submitter_id: &str, key: &str) -> Option<String>;
    fn set(&self, submitter_id: &str, key: &str, value: String);
    fn remove(&self, submitter_id: &str, key: &str) -> Option<String>;
}

/// Process-local store. Contents do not survive a restart.
#[derive(Default)]
pub struct InMemoryVariableStore {
    inner: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableStore for InMemoryVariableStore {
    fn get(&self, submitter_id: &str, key: &str) -> Option<String> {
        let inner = self.inner.lock().ok()?;
        inner.get(submitter_id)?.get(key).cloned()
    }

    fn set(&self, submitter_id: &str, key: &str, value: String) {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .entry(submitter_id.to_string())
                .or_default()
                .insert(key.to_string(), value);
        }
    }

    fn remove(&self, submitter_id: &str, key: &str) -> Option<String> {
        let mut inner = self.inner.lock().ok()?;
        inner.get_mut(submitter_id)?.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryVariableStore::new();
        store.set("cli:alice", "city", "Lisbon".to_string());

        assert_eq!(store.get("cli:alice", "city").as_deref(), Some("Lisbon"));
        assert_eq!(store.remove("cli:alice", "city").as_deref(), Some("Lisbon"));
        assert!(store.get("cli:alice", "city").is_none());
    }

    #[test]
    fn test_submitters_are_isolated() {
        let store = InMemoryVariableStore::new();
        store.set("cli:alice", "city", "Lisbon".to_string());

        assert!(store.get("cli:bob", "city").is_none());
        assert!(store.remove("cli:bob", "city").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let store = InMemoryVariableStore::new();
        store.set("cli:alice", "city", "Lisbon".to_string());
        store.set("cli:alice", "city", "Porto".to_string());
        assert_eq!(store.get("cli:alice", "city").as_deref(), Some("Porto"));
    }
}
