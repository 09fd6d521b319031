//! Context router
//!
//! Resolves a (field name, context id, context type) triple to one of three
//! backends and applies default-value coercion on reads: nothing stored, a
//! stored null and a stored empty string all read back as the caller's
//! default. Falsy values such as `0`, `false` and `"0"` are returned as stored.

use std::path::Path;

use fieldkit_fields::{Context, ContextType, StorageKey};
use serde_json::Value;
use tracing::{debug, trace};

use crate::backend::{MemoryMetaStore, MemoryOptionStore, MetaStore, OptionStore};
use crate::error::Result;
use crate::yaml::{YamlMetaStore, YamlOptionStore};

/// Post, term and settings backends behind one read/write surface.
pub struct ContextRouter {
    post: Box<dyn MetaStore>,
    term: Box<dyn MetaStore>,
    options: Box<dyn OptionStore>,
}

impl std::fmt::Debug for ContextRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRouter").finish_non_exhaustive()
    }
}

impl Default for ContextRouter {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// True for stored values that read back as the default.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl ContextRouter {
    pub fn new(
        post: Box<dyn MetaStore>,
        term: Box<dyn MetaStore>,
        options: Box<dyn OptionStore>,
    ) -> Self {
        Self {
            post,
            term,
            options,
        }
    }

    /// All three backends in memory.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryMetaStore::new()),
            Box::new(MemoryMetaStore::new()),
            Box::new(MemoryOptionStore::new()),
        )
    }

    /// All three backends as YAML files under `root`.
    pub fn yaml(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(
            Box::new(YamlMetaStore::new(root, "post")),
            Box::new(YamlMetaStore::new(root, "term")),
            Box::new(YamlOptionStore::new(root)),
        )
    }

    /// Read `name` for context `id` of type `context_type`.
    ///
    /// An unrecognized `context_type` returns `default` without touching any
    /// backend. Settings values are read from `{id}_{name}`.
    pub fn get_field(
        &self,
        name: &str,
        id: &str,
        context_type: &str,
        default: Value,
    ) -> Result<Value> {
        let Some(context_type) = ContextType::parse(context_type) else {
            debug!(context_type, name, "unknown context type, returning default");
            return Ok(default);
        };
        let key = StorageKey::derive(name, true, &Context::new(context_type, id));
        self.get_value(&key, default)
    }

    /// Read a resolved storage key, coercing unset values to `default`.
    pub fn get_value(&self, key: &StorageKey, default: Value) -> Result<Value> {
        let stored = self.raw(key)?;
        trace!(%key, found = stored.is_some(), "read value");
        Ok(match stored {
            Some(value) if !is_unset(&value) => value,
            _ => default,
        })
    }

    /// Stored value of a resolved key, without default coercion.
    pub fn raw(&self, key: &StorageKey) -> Result<Option<Value>> {
        let context = key.context();
        match context.context_type {
            ContextType::Post => self.post.get(&context.id, key.key()),
            ContextType::Term => self.term.get(&context.id, key.key()),
            ContextType::Settings => self.options.get(key.key()),
        }
    }

    /// Write `name` for context `id` of type `context_type`.
    pub fn set_field(&mut self, name: &str, id: &str, context_type: &str, value: Value) -> Result<()> {
        let context_type: ContextType = context_type.parse()?;
        let key = StorageKey::derive(name, true, &Context::new(context_type, id));
        self.set_value(&key, value)
    }

    /// Write a resolved storage key.
    pub fn set_value(&mut self, key: &StorageKey, value: Value) -> Result<()> {
        trace!(%key, "write value");
        let context = key.context();
        match context.context_type {
            ContextType::Post => self.post.set(&context.id, key.key(), value),
            ContextType::Term => self.term.set(&context.id, key.key(), value),
            ContextType::Settings => self.options.set(key.key(), value),
        }
    }

    /// Remove a resolved storage key. Returns whether a value was present.
    pub fn delete_value(&mut self, key: &StorageKey) -> Result<bool> {
        let context = key.context();
        match context.context_type {
            ContextType::Post => self.post.delete(&context.id, key.key()),
            ContextType::Term => self.term.delete(&context.id, key.key()),
            ContextType::Settings => self.options.delete(key.key()),
        }
    }

    /// Every stored key visible from `context`. Settings contexts only see
    /// keys carrying their `{id}_` prefix.
    pub fn keys(&self, context: &Context) -> Result<Vec<String>> {
        match context.context_type {
            ContextType::Post => self.post.keys(&context.id),
            ContextType::Term => self.term.keys(&context.id),
            ContextType::Settings => {
                let prefix = format!("{}_", context.id);
                Ok(self
                    .options
                    .keys()?
                    .into_iter()
                    .filter(|k| k.starts_with(&prefix))
                    .collect())
            }
        }
    }
}
