//! Runtime field type registry.
//!
//! Maps a type tag to a constructor. The registry has two lifecycle phases:
//! the host may register types eagerly, then built-ins are seeded lazily the
//! first time a field is created. Seeding never replaces a tag that is already
//! present, so a host type registered under `"text"` before seeding survives it.
//! Registrations made after seeding simply overwrite.
//!
//! The registry is request-scoped and single-threaded; it uses interior
//! mutability so that construction can seed on demand through a shared borrow.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::builtin::builtin_types;
use crate::error::{FieldsError, Result};
use crate::field::{Capability, FieldInstance};
use crate::types::FieldConfig;

/// Builds a field instance from its declaration.
pub type Constructor = Arc<dyn Fn(FieldConfig) -> Result<FieldInstance>>;

/// A registered field type: its constructor plus the parts of the field
/// contract it declares to implement.
#[derive(Clone)]
pub struct FieldTypeDef {
    constructor: Constructor,
    capabilities: Vec<Capability>,
}

impl FieldTypeDef {
    /// A type implementing the complete field contract.
    pub fn new(constructor: impl Fn(FieldConfig) -> Result<FieldInstance> + 'static) -> Self {
        Self::with_capabilities(constructor, Capability::ALL)
    }

    /// A type declaring only `capabilities`. Registration rejects it unless
    /// the declaration covers the whole contract.
    pub fn with_capabilities(
        constructor: impl Fn(FieldConfig) -> Result<FieldInstance> + 'static,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        Self {
            constructor: Arc::new(constructor),
            capabilities: capabilities.into_iter().collect(),
        }
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Contract parts this type does not declare.
    pub fn missing_capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| !self.capabilities.contains(c))
            .collect()
    }

    pub fn construct(&self, config: FieldConfig) -> Result<FieldInstance> {
        (self.constructor)(config)
    }
}

impl fmt::Debug for FieldTypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTypeDef")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// Type tag to constructor table.
#[derive(Debug, Default)]
pub struct Registry {
    types: RefCell<IndexMap<String, FieldTypeDef>>,
    seeded: Cell<bool>,
}

impl Registry {
    /// An empty registry. Built-ins are seeded on first [`create`](Self::create).
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-ins already seeded.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Store `def` under `type_name`, replacing any existing mapping.
    ///
    /// Fails with [`FieldsError::MissingCapability`] when `def` does not
    /// declare the full field contract.
    pub fn register_type(&self, type_name: impl Into<String>, def: FieldTypeDef) -> Result<()> {
        let type_name = type_name.into();
        let missing = def.missing_capabilities();
        if !missing.is_empty() {
            return Err(FieldsError::MissingCapability { type_name, missing });
        }
        debug!(%type_name, "registered field type");
        self.types.borrow_mut().insert(type_name, def);
        Ok(())
    }

    /// Seed built-in types. Runs once; tags already registered are kept.
    pub fn register_defaults(&self) {
        if self.seeded.replace(true) {
            return;
        }
        let mut types = self.types.borrow_mut();
        let mut added = 0;
        for (tag, ctor) in builtin_types() {
            if !types.contains_key(tag) {
                types.insert(tag.to_string(), FieldTypeDef::new(ctor));
                added += 1;
            } else {
                debug!(type_name = tag, "keeping host registration over built-in");
            }
        }
        debug!(added, total = types.len(), "seeded built-in field types");
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded.get()
    }

    /// Construct a field from its declaration, seeding built-ins first if needed.
    pub fn create(&self, config: FieldConfig) -> Result<FieldInstance> {
        if !config.has_name() {
            return Err(FieldsError::missing_key("name"));
        }
        if config.type_name().trim().is_empty() {
            return Err(FieldsError::missing_key("type"));
        }
        self.register_defaults();

        // Release the borrow before running host code.
        let def = self.types.borrow().get(config.type_name()).cloned();
        let def = def.ok_or_else(|| FieldsError::unknown_type(config.type_name()))?;
        trace!(name = config.name(), type_name = config.type_name(), "constructing field");
        def.construct(config)
    }

    /// Construct every config in `configs`, keyed by field name.
    ///
    /// A config without a name takes its outer key. When two configs share a
    /// name the later one wins.
    pub fn create_multiple(
        &self,
        configs: IndexMap<String, FieldConfig>,
    ) -> Result<IndexMap<String, FieldInstance>> {
        let mut fields = IndexMap::with_capacity(configs.len());
        for (key, mut config) in configs {
            if !config.has_name() {
                config.name = Some(key);
            }
            let field = self.create(config)?;
            fields.insert(field.name().to_string(), field);
        }
        Ok(fields)
    }

    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.borrow().contains_key(type_name)
    }

    /// Registered tags in registration order.
    pub fn registered_types(&self) -> Vec<String> {
        self.types.borrow().keys().cloned().collect()
    }

    pub fn get_type(&self, type_name: &str) -> Option<FieldTypeDef> {
        self.types.borrow().get(type_name).cloned()
    }

    /// Remove a mapping. Returns whether one was present.
    pub fn unregister_type(&self, type_name: &str) -> bool {
        self.types.borrow_mut().shift_remove(type_name).is_some()
    }

    /// Drop every mapping and re-arm seeding.
    pub fn reset(&self) {
        self.types.borrow_mut().clear();
        self.seeded.set(false);
    }
}
