use std::collections::HashMap;

/// String-valued key-value persistence, injected by the surrounding view.
///
/// The web frontend backs this with browser local storage; tests use
/// `MemoryStore`. Components receive a store by value instead of reaching
/// into a global.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store, for tests and headless use
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }
}
