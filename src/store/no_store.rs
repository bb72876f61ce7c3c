use super::{Store, StoreError};

/// A store used when persistence is disabled: nothing is ever found,
/// and writes are accepted but dropped, so every run starts anonymous.
pub struct NoStore;

impl NoStore {
    pub fn new() -> Self {
        NoStore
    }
}

impl Default for NoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for NoStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
