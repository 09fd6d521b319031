//! The field contract.
//!
//! Every field type implements [`Field`]. Types that organize other fields
//! instead of owning a value additionally implement [`ContainerField`], and
//! the registry hands both back as the closed [`FieldInstance`] enum so
//! callers match on the variant instead of probing capabilities.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::context::{option_name, Context, StorageKey};
use crate::sanitize;
use crate::types::{FieldConfig, ValidationResult};
use crate::validation::{validate_value, Rule};

/// One part of the field contract a registered type must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Render,
    Sanitize,
    Validate,
    Schema,
}

impl Capability {
    /// The complete contract.
    pub const ALL: [Capability; 4] = [
        Capability::Render,
        Capability::Sanitize,
        Capability::Validate,
        Capability::Schema,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Sanitize => "sanitize",
            Self::Validate => "validate",
            Self::Schema => "schema",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, de-duplicated asset handles requested by fields during a render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetQueue {
    handles: IndexSet<String>,
}

impl AssetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, handle: impl Into<String>) {
        self.handles.insert(handle.into());
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.handles.contains(handle)
    }

    pub fn handles(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Behavior shared by every field instance.
pub trait Field: fmt::Debug {
    /// The merged declaration this instance was built from.
    fn config(&self) -> &FieldConfig;

    fn config_mut(&mut self) -> &mut FieldConfig;

    /// Edit markup for `value`.
    fn render(&self, value: &Value) -> String;

    /// Clean submitted input. Strings are stripped of markup and whitespace
    /// runs; other values pass through.
    fn sanitize(&self, input: Value) -> Value {
        sanitize::default_value(input)
    }

    /// Rules the type adds on top of the declared ones.
    fn implicit_rules(&self) -> Vec<Rule> {
        Vec::new()
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        validate_value(self.config(), &self.label(), input, &self.implicit_rules())
    }

    fn name(&self) -> &str {
        self.config().name()
    }

    fn label(&self) -> String {
        self.config().label()
    }

    fn field_type(&self) -> &str {
        self.config().type_name()
    }

    /// JSON type of the stored value, reported in the schema.
    fn value_type(&self) -> &'static str {
        "string"
    }

    /// Whether the save pipeline writes this field. Display-only leaves opt out.
    fn persists(&self) -> bool {
        true
    }

    /// Descriptive mapping of this field.
    fn schema(&self) -> Value {
        base_schema(self.config(), &self.label(), self.value_type())
    }

    fn get_config(&self, key: &str) -> Option<Value> {
        self.config().get(key)
    }

    fn set_config(&mut self, key: &str, value: Value) {
        self.config_mut().set(key, value);
    }

    /// Settings option name under `prefix`, honoring `use_name_prefix`.
    fn option_name(&self, prefix: &str) -> String {
        option_name(self.name(), prefix, self.config().use_name_prefix)
    }

    /// Request scripts/styles this field needs. Nothing by default.
    fn enqueue_assets(&self, _assets: &mut AssetQueue) {}
}

/// Markup produced for one nested field during a container render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedChild {
    pub markup: String,
    /// False when the renderer found nothing stored for this slot.
    pub has_value: bool,
}

/// Callback a container uses to render one nested declaration. The second
/// argument is the repeater row index, `None` outside repeaters.
///
/// An unbounded repeater keeps asking for rows while children report
/// `has_value`; it stops at the first row whose children produce no markup.
pub type ChildRenderer<'a> = dyn FnMut(&FieldConfig, Option<usize>) -> RenderedChild + 'a;

/// Row limits of a repeating container. Leaves inside it store one array
/// entry per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBounds {
    pub min: usize,
    /// `None` when unbounded
    pub max: Option<usize>,
}

impl RowBounds {
    /// Why `count` rows are not acceptable, if they are not.
    pub fn check(&self, label: &str, count: usize) -> Option<String> {
        if count < self.min {
            return Some(format!("{label} needs at least {} rows.", self.min));
        }
        match self.max {
            Some(max) if count > max => Some(format!("{label} allows at most {max} rows.")),
            _ => None,
        }
    }
}

/// A field that owns no value and organizes nested declarations.
pub trait ContainerField: Field {
    /// Nested declarations in display order, flattened across any grouping
    /// (tabs) the container applies.
    fn nested_fields(&self) -> Vec<&FieldConfig>;

    /// Wrap nested markup produced by `child` in this container's frame.
    fn render_nested(&self, child: &mut ChildRenderer<'_>) -> String;

    /// Row limits when nested leaves repeat per row. Only repeaters have them.
    fn row_bounds(&self) -> Option<RowBounds> {
        None
    }
}

/// A constructed field: either a leaf that owns one value, or a container.
#[derive(Debug)]
pub enum FieldInstance {
    Leaf(Box<dyn Field>),
    Container(Box<dyn ContainerField>),
}

impl FieldInstance {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// The common contract, whatever the variant.
    pub fn field(&self) -> &dyn Field {
        match self {
            Self::Leaf(f) => f.as_ref(),
            Self::Container(c) => c.as_ref(),
        }
    }

    pub fn field_mut(&mut self) -> &mut dyn Field {
        match self {
            Self::Leaf(f) => f.as_mut(),
            Self::Container(c) => c.as_mut(),
        }
    }

    pub fn as_container(&self) -> Option<&dyn ContainerField> {
        match self {
            Self::Container(c) => Some(c.as_ref()),
            Self::Leaf(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        self.field().name()
    }

    pub fn field_type(&self) -> &str {
        self.field().field_type()
    }

    /// Where this instance's value lives in `context`. Containers have no key.
    pub fn storage_key(&self, context: &Context) -> Option<StorageKey> {
        match self {
            Self::Leaf(f) => Some(leaf_storage_key(f.as_ref(), context)),
            Self::Container(_) => None,
        }
    }
}

/// Storage key of a leaf field in `context`.
pub fn leaf_storage_key(field: &dyn Field, context: &Context) -> StorageKey {
    StorageKey::derive(field.name(), field.config().use_name_prefix, context)
}

/// Schema entries every field shares, plus its type-specific keys.
pub fn base_schema(config: &FieldConfig, label: &str, value_type: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("name".into(), json!(config.name()));
    schema.insert("type".into(), json!(config.type_name()));
    schema.insert("label".into(), json!(label));
    if let Some(description) = &config.description {
        schema.insert("description".into(), json!(description));
    }
    schema.insert("required".into(), json!(config.required));
    if let Some(default) = &config.default {
        schema.insert("default".into(), default.clone());
    }
    if !config.validation.is_empty() {
        schema.insert("validation".into(), json!(config.validation));
    }
    schema.insert("value_type".into(), json!(value_type));
    for (key, value) in &config.extra {
        schema.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_names() {
        let names: Vec<_> = Capability::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["render", "sanitize", "validate", "schema"]);
    }

    #[test]
    fn asset_queue_deduplicates_in_order() {
        let mut queue = AssetQueue::new();
        queue.enqueue("color-picker");
        queue.enqueue("datepicker");
        queue.enqueue("color-picker");
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.handles().collect::<Vec<_>>(),
            vec!["color-picker", "datepicker"]
        );
        assert!(queue.contains("datepicker"));
    }

    #[test]
    fn row_bounds_check_counts() {
        let bounds = RowBounds { min: 1, max: Some(2) };
        assert_eq!(bounds.check("Phones", 0).as_deref(), Some("Phones needs at least 1 rows."));
        assert_eq!(bounds.check("Phones", 1), None);
        assert_eq!(bounds.check("Phones", 2), None);
        assert_eq!(bounds.check("Phones", 3).as_deref(), Some("Phones allows at most 2 rows."));
        let open = RowBounds { min: 0, max: None };
        assert_eq!(open.check("Phones", 500), None);
    }

    #[test]
    fn base_schema_includes_declared_keys() {
        let config = FieldConfig::new("rows_demo", "textarea")
            .with_description("Notes")
            .with_rule("max", json!(10))
            .with_extra("rows", json!(4));
        let schema = base_schema(&config, "Rows Demo", "string");
        assert_eq!(schema["name"], "rows_demo");
        assert_eq!(schema["type"], "textarea");
        assert_eq!(schema["label"], "Rows Demo");
        assert_eq!(schema["description"], "Notes");
        assert_eq!(schema["validation"]["max"], 10);
        assert_eq!(schema["rows"], 4);
        assert_eq!(schema["required"], false);
    }
}
