//! Core declaration types.
//!
//! A [`FieldConfig`] is the declarative description of one field as the host
//! authors it. Well-known keys are named struct members; everything else a
//! particular field type understands (`options`, `rows`, `content`, ...) lives
//! in the ordered `extra` bag so type defaults can be merged in without losing
//! what the host wrote.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_true() -> bool {
    true
}

fn is_true(v: &bool) -> bool {
    *v
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Declarative description of a single field, possibly containing nested fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Validation rules in declaration order; evaluation follows this order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub validation: IndexMap<String, Value>,
    /// When false, settings storage keys are not prefixed with the context id.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub use_name_prefix: bool,
    /// Nested declarations owned by container types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldConfig>,
    /// Type-specific keys.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            name: None,
            type_: None,
            label: None,
            description: None,
            placeholder: None,
            default: None,
            required: false,
            validation: IndexMap::new(),
            use_name_prefix: true,
            fields: Vec::new(),
            extra: IndexMap::new(),
        }
    }
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_: Some(type_.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a validation rule. Rules run in the order they are added.
    pub fn with_rule(mut self, rule: impl Into<String>, param: Value) -> Self {
        self.validation.insert(rule.into(), param);
        self
    }

    /// Set a type-specific key.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldConfig>) -> Self {
        self.fields = fields;
        self
    }

    pub fn without_name_prefix(mut self) -> Self {
        self.use_name_prefix = false;
        self
    }

    /// The field name, or `""` for a malformed declaration.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The type tag, or `""` for a malformed declaration.
    pub fn type_name(&self) -> &str {
        self.type_.as_deref().unwrap_or_default()
    }

    /// True when `name` is present and not blank.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Explicit label, falling back to a humanized name.
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => humanize(self.name()),
        }
    }

    /// Fill type defaults into the extension bag. Keys the host set win.
    pub fn merge_defaults(&mut self, defaults: &[(&str, Value)]) {
        for (key, value) in defaults {
            if !self.extra.contains_key(*key) {
                self.extra.insert((*key).to_string(), value.clone());
            }
        }
    }

    /// Read any key, named or extension.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "name" => self.name.clone().map(Value::String),
            "type" => self.type_.clone().map(Value::String),
            "label" => Some(Value::String(self.label())),
            "description" => self.description.clone().map(Value::String),
            "placeholder" => self.placeholder.clone().map(Value::String),
            "default" => self.default.clone(),
            "required" => Some(Value::Bool(self.required)),
            "use_name_prefix" => Some(Value::Bool(self.use_name_prefix)),
            "validation" => serde_json::to_value(&self.validation).ok(),
            "fields" => serde_json::to_value(&self.fields).ok(),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Write any key, named or extension. Values of the wrong shape for a
    /// named key are ignored.
    pub fn set(&mut self, key: &str, value: Value) {
        match key {
            "name" => self.name = value.as_str().map(str::to_string),
            "type" => self.type_ = value.as_str().map(str::to_string),
            "label" => self.label = value.as_str().map(str::to_string),
            "description" => self.description = value.as_str().map(str::to_string),
            "placeholder" => self.placeholder = value.as_str().map(str::to_string),
            "default" => self.default = Some(value),
            "required" => self.required = value.as_bool().unwrap_or(false),
            "use_name_prefix" => self.use_name_prefix = value.as_bool().unwrap_or(true),
            "validation" => {
                if let Ok(rules) = serde_json::from_value(value) {
                    self.validation = rules;
                }
            }
            "fields" => {
                if let Ok(fields) = serde_json::from_value(value) {
                    self.fields = fields;
                }
            }
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(as_number)
    }

    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra_f64(key)
            .filter(|n| *n >= 0.0)
            .map(|n| n as u64)
    }

    pub fn extra_bool(&self, key: &str) -> bool {
        self.extra.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// One entry of a select or radio field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// Parse the `options` key. Accepts a `{value: label}` mapping, a list of
    /// plain strings, or a list of `{value, label}` objects.
    pub fn parse_list(options: Option<&Value>) -> Vec<SelectOption> {
        match options {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(value, label)| SelectOption {
                    value: value.clone(),
                    label: scalar_to_string(label),
                })
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => {
                        let value = obj.get("value").map(scalar_to_string)?;
                        let label = obj
                            .get("label")
                            .map(scalar_to_string)
                            .unwrap_or_else(|| value.clone());
                        Some(SelectOption { value, label })
                    }
                    Value::Null => None,
                    other => {
                        let value = scalar_to_string(other);
                        Some(SelectOption {
                            label: value.clone(),
                            value,
                        })
                    }
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Outcome of validating one value against one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Valid iff `errors` is empty.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// All messages joined into a single line.
    pub fn message(&self) -> String {
        self.errors.join(" ")
    }
}

/// `"store_currency"` -> `"Store Currency"`.
pub fn humanize(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric reading of a value: numbers, and strings that parse as numbers.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
        _ => None,
    }
}

/// Plain-text form of a scalar. Containers and null render as `""`.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}
