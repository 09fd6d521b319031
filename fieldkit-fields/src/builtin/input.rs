//! Single-line `<input>` fields: text, password, email, url, date, color, number.

use serde_json::{json, Value};

use super::markup::{common_attrs, display_value, esc_attr, input_id, input_name, wrap};
use crate::error::Result;
use crate::field::{AssetQueue, Field, FieldInstance};
use crate::sanitize;
use crate::types::FieldConfig;
use crate::validation::Rule;

/// Flavor of a single-line input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Password,
    Email,
    Url,
    Date,
    Color,
    Number,
}

impl InputKind {
    fn html_type(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
            Self::Url => "url",
            Self::Date => "date",
            // Rendered as text so the picker script can attach.
            Self::Color => "text",
            Self::Number => "number",
        }
    }
}

#[derive(Debug)]
pub struct InputField {
    config: FieldConfig,
    kind: InputKind,
}

impl InputField {
    pub fn new(mut config: FieldConfig, kind: InputKind) -> Self {
        if kind == InputKind::Number {
            config.merge_defaults(&[("step", json!(1))]);
        }
        Self { config, kind }
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    fn build(config: FieldConfig, kind: InputKind) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(config, kind))))
    }

    pub fn text(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Text)
    }

    pub fn password(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Password)
    }

    pub fn email(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Email)
    }

    pub fn url(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Url)
    }

    pub fn date(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Date)
    }

    pub fn color(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Color)
    }

    pub fn number(config: FieldConfig) -> Result<FieldInstance> {
        Self::build(config, InputKind::Number)
    }

    fn number_attrs(&self) -> String {
        ["min", "max", "step"]
            .iter()
            .filter_map(|key| {
                self.config
                    .extra
                    .get(*key)
                    .map(|v| format!(r#" {key}="{}""#, esc_attr(&display_value(v))))
            })
            .collect()
    }
}

impl Field for InputField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    fn render(&self, value: &Value) -> String {
        // Stored passwords are never echoed back into the page.
        let shown = match self.kind {
            InputKind::Password => String::new(),
            _ => display_value(value),
        };
        let mut attrs = common_attrs(&self.config);
        match self.kind {
            InputKind::Number => attrs.push_str(&self.number_attrs()),
            InputKind::Color => attrs.push_str(r#" class="fieldkit-color-picker""#),
            InputKind::Password => attrs.push_str(r#" autocomplete="new-password""#),
            _ => {}
        }
        let control = format!(
            r#"<input type="{ty}" id="{id}" name="{name}" value="{value}"{attrs}>"#,
            ty = self.kind.html_type(),
            id = input_id(&self.config),
            name = esc_attr(&input_name(&self.config)),
            value = esc_attr(&shown),
        );
        wrap(&self.config, &self.label(), &control)
    }

    fn sanitize(&self, input: Value) -> Value {
        match self.kind {
            InputKind::Text | InputKind::Password => sanitize::default_value(input),
            InputKind::Email => sanitize::map_string(input, sanitize::email),
            InputKind::Url => sanitize::map_string(input, sanitize::url),
            InputKind::Date => sanitize::map_string(input, sanitize::date),
            InputKind::Color => sanitize::map_string(input, sanitize::hex_color),
            InputKind::Number => sanitize::number(input),
        }
    }

    fn implicit_rules(&self) -> Vec<Rule> {
        match self.kind {
            InputKind::Email => vec![Rule::Email],
            InputKind::Url => vec![Rule::Url],
            _ => Vec::new(),
        }
    }

    fn value_type(&self) -> &'static str {
        match self.kind {
            InputKind::Number => "number",
            _ => "string",
        }
    }

    fn enqueue_assets(&self, assets: &mut AssetQueue) {
        match self.kind {
            InputKind::Color => assets.enqueue("fieldkit-color-picker"),
            InputKind::Date => assets.enqueue("fieldkit-datepicker"),
            _ => {}
        }
    }
}
