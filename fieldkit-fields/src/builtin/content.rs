//! Multi-line and content fields: textarea, wysiwyg, custom_html, upload.

use serde_json::{json, Value};

use super::markup::{common_attrs, display_value, esc_attr, esc_html, input_id, input_name, wrap};
use crate::error::Result;
use crate::field::{AssetQueue, Field, FieldInstance};
use crate::sanitize;
use crate::types::{as_number, FieldConfig};

/// Plain multi-line text.
#[derive(Debug)]
pub struct TextareaField {
    config: FieldConfig,
}

impl TextareaField {
    pub fn new(mut config: FieldConfig) -> Self {
        config.merge_defaults(&[("rows", json!(5))]);
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(config))))
    }
}

impl Field for TextareaField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    fn render(&self, value: &Value) -> String {
        let control = format!(
            r#"<textarea id="{id}" name="{name}" rows="{rows}"{attrs}>{value}</textarea>"#,
            id = input_id(&self.config),
            name = esc_attr(&input_name(&self.config)),
            rows = self.config.extra_u64("rows").unwrap_or(5),
            attrs = common_attrs(&self.config),
            value = esc_html(&display_value(value)),
        );
        wrap(&self.config, &self.label(), &control)
    }

    fn sanitize(&self, input: Value) -> Value {
        sanitize::map_string(input, sanitize::textarea)
    }
}

/// Rich text edited through an editor widget. Keeps formatting markup.
#[derive(Debug)]
pub struct WysiwygField {
    config: FieldConfig,
}

impl WysiwygField {
    pub fn new(mut config: FieldConfig) -> Self {
        config.merge_defaults(&[("rows", json!(10)), ("media_buttons", json!(true))]);
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(config))))
    }
}

impl Field for WysiwygField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    fn render(&self, value: &Value) -> String {
        let control = format!(
            r#"<textarea class="fieldkit-wysiwyg" id="{id}" name="{name}" rows="{rows}" data-media-buttons="{media}">{value}</textarea>"#,
            id = input_id(&self.config),
            name = esc_attr(&input_name(&self.config)),
            rows = self.config.extra_u64("rows").unwrap_or(10),
            media = self.config.extra_bool("media_buttons"),
            value = esc_html(&display_value(value)),
        );
        wrap(&self.config, &self.label(), &control)
    }

    fn sanitize(&self, input: Value) -> Value {
        sanitize::map_string(input, sanitize::rich_text)
    }

    fn enqueue_assets(&self, assets: &mut AssetQueue) {
        assets.enqueue("fieldkit-editor");
    }
}

/// Static markup shown between fields. Never stores a value.
#[derive(Debug)]
pub struct CustomHtmlField {
    config: FieldConfig,
}

impl CustomHtmlField {
    pub fn new(mut config: FieldConfig) -> Self {
        config.merge_defaults(&[("content", json!(""))]);
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(config))))
    }
}

impl Field for CustomHtmlField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    /// The declared content is host-authored markup and is emitted as is.
    fn render(&self, _value: &Value) -> String {
        format!(
            r#"<div class="fieldkit-field fieldkit-field-custom_html" id="{id}">{content}</div>"#,
            id = input_id(&self.config),
            content = self.config.extra_str("content").unwrap_or_default(),
        )
    }

    fn sanitize(&self, _input: Value) -> Value {
        Value::Null
    }

    fn value_type(&self) -> &'static str {
        "null"
    }

    fn persists(&self) -> bool {
        false
    }
}

/// A media reference: either an attachment id or a file URL.
#[derive(Debug)]
pub struct UploadField {
    config: FieldConfig,
}

impl UploadField {
    pub fn new(mut config: FieldConfig) -> Self {
        config.merge_defaults(&[("button_label", json!("Select File"))]);
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Leaf(Box::new(Self::new(config))))
    }
}

impl Field for UploadField {
    fn config(&self) -> &FieldConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    fn render(&self, value: &Value) -> String {
        let control = format!(
            r#"<input type="text" class="fieldkit-upload-url" id="{id}" name="{name}" value="{value}"{attrs}><button type="button" class="button fieldkit-upload-button" data-target="{id}">{button}</button>"#,
            id = input_id(&self.config),
            name = esc_attr(&input_name(&self.config)),
            value = esc_attr(&display_value(value)),
            attrs = common_attrs(&self.config),
            button = esc_html(self.config.extra_str("button_label").unwrap_or("Select File")),
        );
        wrap(&self.config, &self.label(), &control)
    }

    /// Numeric input is an attachment id; anything else is treated as a URL.
    fn sanitize(&self, input: Value) -> Value {
        match &input {
            Value::Number(_) => input,
            Value::String(s) => match as_number(&input) {
                Some(id) if id.fract() == 0.0 && id >= 0.0 => json!(id as u64),
                _ => Value::String(sanitize::url(s)),
            },
            _ => input,
        }
    }

    fn enqueue_assets(&self, assets: &mut AssetQueue) {
        assets.enqueue("fieldkit-media");
    }
}
