//! Storage backend traits and in-memory implementations
//!
//! Post and term values are scoped by object id ([`MetaStore`]); settings
//! values live in one flat namespace ([`OptionStore`]).

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;

/// Key/value storage scoped by object id.
pub trait MetaStore: Send + Sync {
    /// Stored value of `key` on object `object_id`
    fn get(&self, object_id: &str, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key` on object `object_id`, replacing any previous value
    fn set(&mut self, object_id: &str, key: &str, value: Value) -> Result<()>;

    /// Remove a value. Returns whether one was present
    fn delete(&mut self, object_id: &str, key: &str) -> Result<bool>;

    /// Keys stored on `object_id`
    fn keys(&self, object_id: &str) -> Result<Vec<String>>;
}

/// Flat key/value storage for settings.
pub trait OptionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn delete(&mut self, key: &str) -> Result<bool>;

    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory [`MetaStore`]. Values are lost when it is dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryMetaStore {
    objects: IndexMap<String, IndexMap<String, Value>>,
}

impl MemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaStore for MemoryMetaStore {
    fn get(&self, object_id: &str, key: &str) -> Result<Option<Value>> {
        Ok(self
            .objects
            .get(object_id)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&mut self, object_id: &str, key: &str, value: Value) -> Result<()> {
        self.objects
            .entry(object_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, object_id: &str, key: &str) -> Result<bool> {
        Ok(self
            .objects
            .get_mut(object_id)
            .and_then(|values| values.shift_remove(key))
            .is_some())
    }

    fn keys(&self, object_id: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .get(object_id)
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default())
    }
}

/// In-memory [`OptionStore`].
#[derive(Debug, Default, Clone)]
pub struct MemoryOptionStore {
    values: IndexMap<String, Value>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryOptionStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.values.shift_remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.keys().cloned().collect())
    }
}
