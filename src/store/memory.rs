use std::collections::HashMap;

use super::{Result, Store};

/// In-memory store. Used by tests and by embedders that do not want watch
/// history to outlive the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}
