//! Declarative documents.
//!
//! A document lists the resources a host should expose, each with the fields
//! edited on it:
//!
//! ```yaml
//! cpts:
//!   - id: product
//!     args: { public: true }
//!     fields:
//!       - { name: price, type: number, required: true, validation: { min: 0 } }
//! taxonomies:
//!   - id: brand
//!     object_type: [product]
//! settings_pages:
//!   - id: store-settings
//!     fields:
//!       - { name: currency, type: select, options: [USD, EUR] }
//! ```
//!
//! Whether a resource already exists, and how it is registered, is decided by
//! the host through [`ResourceRegistrar`].

use std::fmt;

use fieldkit_fields::{leaves, ContextType, FieldConfig, FieldsError, Registry};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FieldkitError, Result};

/// The three kinds of resource a document declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    PostType,
    Taxonomy,
    SettingsPage,
}

impl ResourceKind {
    /// Where values of fields declared on this kind of resource are stored.
    pub fn context_type(&self) -> ContextType {
        match self {
            Self::PostType => ContextType::Post,
            Self::Taxonomy => ContextType::Term,
            Self::SettingsPage => ContextType::Settings,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostType => "post type",
            Self::Taxonomy => "taxonomy",
            Self::SettingsPage => "settings page",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Passed through to the host untouched
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, Value>,
    /// Post types a taxonomy attaches to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
}

impl ResourceDecl {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldConfig>) -> Self {
        self.fields = fields;
        self
    }

    /// The id, or `""` when it is missing.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    fn require_id(&self) -> Result<&str> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(FieldsError::missing_key("id").into()),
        }
    }
}

/// Fields edited on one resource, with where their values live.
#[derive(Debug, Clone, Copy)]
pub struct FieldSet<'a> {
    pub kind: ResourceKind,
    pub resource_id: &'a str,
    pub fields: &'a [FieldConfig],
}

impl FieldSet<'_> {
    pub fn context_type(&self) -> ContextType {
        self.kind.context_type()
    }
}

/// A field name that appears more than once among the flattened leaves of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub name: String,
    pub count: usize,
}

/// Approves a JSON document before it is decoded.
pub trait SchemaValidator {
    /// Problems found in `document`; empty when it is acceptable.
    fn validate(&self, document: &Value) -> Vec<String>;
}

/// Checks the document's outline: an object whose resource lists hold
/// objects with a string `id` and, when present, a `fields` list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeValidator;

impl SchemaValidator for ShapeValidator {
    fn validate(&self, document: &Value) -> Vec<String> {
        let Some(root) = document.as_object() else {
            return vec!["document must be an object".to_string()];
        };
        let mut problems = Vec::new();
        for (key, value) in root {
            if !matches!(key.as_str(), "cpts" | "taxonomies" | "settings_pages") {
                problems.push(format!("unexpected key '{key}'"));
                continue;
            }
            let Some(items) = value.as_array() else {
                problems.push(format!("{key} must be a list"));
                continue;
            };
            for (i, item) in items.iter().enumerate() {
                if !item.get("id").is_some_and(Value::is_string) {
                    problems.push(format!("{key}[{i}].id must be a string"));
                }
                if item.get("fields").is_some_and(|f| !f.is_array()) {
                    problems.push(format!("{key}[{i}].fields must be a list"));
                }
            }
        }
        problems
    }
}

/// The host side of resource registration.
pub trait ResourceRegistrar {
    fn exists(&self, kind: ResourceKind, id: &str) -> bool;

    fn register(&mut self, kind: ResourceKind, resource: &ResourceDecl) -> Result<()>;
}

/// A [`ResourceRegistrar`] that records registrations in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistrar {
    resources: IndexMap<(ResourceKind, String), IndexMap<String, Value>>,
}

impl MemoryRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `id` was registered by someone else beforehand.
    pub fn with_existing(mut self, kind: ResourceKind, id: impl Into<String>) -> Self {
        self.resources.insert((kind, id.into()), IndexMap::new());
        self
    }

    pub fn args(&self, kind: ResourceKind, id: &str) -> Option<&IndexMap<String, Value>> {
        self.resources.get(&(kind, id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceRegistrar for MemoryRegistrar {
    fn exists(&self, kind: ResourceKind, id: &str) -> bool {
        self.resources.contains_key(&(kind, id.to_string()))
    }

    fn register(&mut self, kind: ResourceKind, resource: &ResourceDecl) -> Result<()> {
        self.resources
            .insert((kind, resource.id().to_string()), resource.args.clone());
        Ok(())
    }
}

/// What [`Document::register`] did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegistrationReport {
    pub registered: Vec<(ResourceKind, String)>,
    /// Resources the host already had; left untouched
    pub existing: Vec<(ResourceKind, String)>,
}

/// A parsed declarative document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub cpts: Vec<ResourceDecl>,
    #[serde(default)]
    pub taxonomies: Vec<ResourceDecl>,
    #[serde(default)]
    pub settings_pages: Vec<ResourceDecl>,
}

impl Document {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Decode a JSON document once `validator` accepts it.
    pub fn from_json(source: &str, validator: &dyn SchemaValidator) -> Result<Self> {
        let raw: Value = serde_json::from_str(source)?;
        let messages = validator.validate(&raw);
        if !messages.is_empty() {
            return Err(FieldkitError::SchemaRejected { messages });
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// Every resource with its kind, post types first.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceKind, &ResourceDecl)> {
        let cpts = self.cpts.iter().map(|r| (ResourceKind::PostType, r));
        let taxonomies = self.taxonomies.iter().map(|r| (ResourceKind::Taxonomy, r));
        let pages = self
            .settings_pages
            .iter()
            .map(|r| (ResourceKind::SettingsPage, r));
        cpts.chain(taxonomies).chain(pages)
    }

    /// The first resource with `id`, of any kind.
    pub fn resource(&self, id: &str) -> Result<(ResourceKind, &ResourceDecl)> {
        self.resources()
            .find(|(_, r)| r.id() == id)
            .ok_or_else(|| FieldkitError::resource_not_found(id))
    }

    /// Field lists per resource, skipping resources without fields.
    pub fn field_sets(&self) -> Vec<FieldSet<'_>> {
        self.resources()
            .filter(|(_, r)| !r.fields.is_empty())
            .map(|(kind, r)| FieldSet {
                kind,
                resource_id: r.id(),
                fields: &r.fields,
            })
            .collect()
    }

    /// Check every resource has an id and every top-level field constructs.
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        for (kind, resource) in self.resources() {
            let id = resource.require_id()?;
            for config in &resource.fields {
                registry.create(config.clone())?;
            }
            debug!(%kind, id, fields = resource.fields.len(), "resource declaration ok");
        }
        Ok(())
    }

    /// Register every resource the host does not already have.
    pub fn register(&self, registrar: &mut dyn ResourceRegistrar) -> Result<RegistrationReport> {
        let mut report = RegistrationReport::default();
        for (kind, resource) in self.resources() {
            let id = resource.require_id()?;
            if registrar.exists(kind, id) {
                debug!(%kind, id, "resource already exists, not registering");
                report.existing.push((kind, id.to_string()));
                continue;
            }
            registrar.register(kind, resource)?;
            debug!(%kind, id, "registered resource");
            report.registered.push((kind, id.to_string()));
        }
        Ok(report)
    }

    /// Flattened leaf names declared more than once on the same resource.
    /// Such fields share a storage key, so the last one saved wins.
    pub fn collisions(&self, registry: &Registry) -> Result<Vec<Collision>> {
        let mut collisions = Vec::new();
        for set in self.field_sets() {
            let instances = set
                .fields
                .iter()
                .map(|config| registry.create(config.clone()))
                .collect::<fieldkit_fields::Result<Vec<_>>>()?;
            let mut counts: IndexMap<String, usize> = IndexMap::new();
            for leaf in leaves(registry, instances) {
                if leaf.persists() {
                    *counts.entry(leaf.name().to_string()).or_default() += 1;
                }
            }
            for (name, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
                warn!(kind = %set.kind, resource = set.resource_id, field = %name, count, "field name collision");
                collisions.push(Collision {
                    kind: set.kind,
                    resource_id: set.resource_id.to_string(),
                    name,
                    count,
                });
            }
        }
        Ok(collisions)
    }
}
