//! Choice fields: select, radio and checkbox.

use serde_json::{json, Value};

use super::markup::{esc_attr, esc_html, input_id, input_name, wrap};
use crate::error::Result;
use crate::field::{Field, FieldInstance};
use crate::sanitize;
use crate::types::{scalar_to_string, FieldConfig, SelectOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Select,
    Radio,
}

/// A field whose value must be one of its declared `options`.
#[derive(Debug)]
pub struct ChoiceField {
    config: FieldConfig,
    kind: ChoiceKind,
    options: Vec<SelectOption>,
}

impl ChoiceField {
    pub fn new(mut config: FieldConfig, kind: ChoiceKind) -> Self {
        config.merge_defaults(&[("options", json!({}))]);
        let options = SelectOption::parse_list(config.extra.get("options"));
        Self {
            config,
            kind,
            options,
        }
    }

    pub fn select(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(
            config,
            ChoiceKind::Select,
        ))))
    }

    pub fn radio(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(
            config,
            ChoiceKind::Radio,
        ))))
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Multiple selection is only meaningful for selects.
    fn multiple(&self) -> bool {
        self.kind == ChoiceKind::Select && self.config.extra_bool("multiple")
    }

    fn is_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    fn selected(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Array(items) => items.iter().map(scalar_to_string).collect(),
            Value::Null => Vec::new(),
            other => vec![scalar_to_string(other)],
        }
    }

    fn render_select(&self, selected: &[String]) -> String {
        let multiple = self.multiple();
        let name = input_name(&self.config);
        let name = if multiple { format!("{name}[]") } else { name };
        let mut html = format!(
            r#"<select id="{id}" name="{name}"{multiple}{required}>"#,
            id = input_id(&self.config),
            name = esc_attr(&name),
            multiple = if multiple { " multiple" } else { "" },
            required = if self.config.required { " required" } else { "" },
        );
        if !multiple {
            let placeholder = self.config.placeholder.as_deref().unwrap_or("");
            html.push_str(&format!(
                r#"<option value="">{}</option>"#,
                esc_html(placeholder)
            ));
        }
        for option in &self.options {
            let is_selected = selected.contains(&option.value);
            html.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                esc_attr(&option.value),
                if is_selected { " selected" } else { "" },
                esc_html(&option.label)
            ));
        }
        html.push_str("</select>");
        html
    }

    fn render_radio(&self, selected: &[String]) -> String {
        let name = input_name(&self.config);
        let id = input_id(&self.config);
        let mut html = String::from(r#"<fieldset class="fieldkit-radio-group">"#);
        for (i, option) in self.options.iter().enumerate() {
            html.push_str(&format!(
                r#"<label><input type="radio" id="{id}-{i}" name="{name}" value="{value}"{checked}> {label}</label>"#,
                name = esc_attr(&name),
                value = esc_attr(&option.value),
                checked = if selected.contains(&option.value) { " checked" } else { "" },
                label = esc_html(&option.label),
            ));
        }
        html.push_str("</fieldset>");
        html
    }
}

impl Field for ChoiceField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    fn render(&self, value: &Value) -> String {
        let selected = self.selected(value);
        let control = match self.kind {
            ChoiceKind::Select => self.render_select(&selected),
            ChoiceKind::Radio => self.render_radio(&selected),
        };
        wrap(&self.config, &self.label(), &control)
    }

    /// Values outside the declared options are dropped.
    fn sanitize(&self, input: Value) -> Value {
        if self.multiple() {
            let items = match input {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => vec![other],
            };
            let kept = items
                .iter()
                .map(|v| sanitize::text(&scalar_to_string(v)))
                .filter(|v| self.is_option(v))
                .map(Value::String)
                .collect();
            return Value::Array(kept);
        }
        match input {
            Value::Null => Value::Null,
            other => {
                let value = sanitize::text(&scalar_to_string(&other));
                if self.is_option(&value) {
                    Value::String(value)
                } else {
                    Value::String(String::new())
                }
            }
        }
    }

    fn value_type(&self) -> &'static str {
        if self.multiple() {
            "array"
        } else {
            "string"
        }
    }
}

/// A boolean toggle.
#[derive(Debug)]
pub struct CheckboxField {
    config: FieldConfig,
}

impl CheckboxField {
    pub fn new(config: FieldConfig) -> Self {
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(config))))
    }
}

impl Field for CheckboxField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    fn render(&self, value: &Value) -> String {
        let checked = sanitize::checkbox(value.clone()) == Value::Bool(true);
        let caption = self
            .config
            .extra_str("caption")
            .map(|c| format!(" {}", esc_html(c)))
            .unwrap_or_default();
        let control = format!(
            r#"<input type="hidden" name="{name}" value="0"><label class="fieldkit-checkbox"><input type="checkbox" id="{id}" name="{name}" value="1"{checked}>{caption}</label>"#,
            name = esc_attr(&input_name(&self.config)),
            id = input_id(&self.config),
            checked = if checked { " checked" } else { "" },
        );
        wrap(&self.config, &self.label(), &control)
    }

    fn sanitize(&self, input: Value) -> Value {
        sanitize::checkbox(input)
    }

    fn value_type(&self) -> &'static str {
        "boolean"
    }
}
