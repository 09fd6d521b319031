//! Small HTML helpers used by the built-in renderers.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

use crate::types::{scalar_to_string, FieldConfig};

pub fn esc_attr(s: &str) -> String {
    encode_double_quoted_attribute(s).into_owned()
}

pub fn esc_html(s: &str) -> String {
    encode_text(s).into_owned()
}

/// The `name` attribute for a control. Renderers may override it through the
/// `input_name` key (repeater rows use `field[]`).
pub fn input_name(config: &FieldConfig) -> String {
    config
        .extra_str("input_name")
        .map(str::to_string)
        .unwrap_or_else(|| config.name().to_string())
}

/// DOM id for a control, derived from its input name.
pub fn input_id(config: &FieldConfig) -> String {
    input_name(config)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect::<String>()
        .trim_end_matches('_')
        .to_string()
}

/// Value as it appears inside a control.
pub fn display_value(value: &Value) -> String {
    scalar_to_string(value)
}

/// `required` / `placeholder` attributes shared by input-like controls.
pub fn common_attrs(config: &FieldConfig) -> String {
    let mut attrs = String::new();
    if let Some(placeholder) = &config.placeholder {
        attrs.push_str(&format!(r#" placeholder="{}""#, esc_attr(placeholder)));
    }
    if config.required {
        attrs.push_str(" required");
    }
    attrs
}

/// Standard frame around a leaf control: label, control, description.
pub fn wrap(config: &FieldConfig, label: &str, control: &str) -> String {
    let required = if config.required {
        r#" <span class="required">*</span>"#
    } else {
        ""
    };
    let description = config
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="description">{}</p>"#, esc_html(d)))
        .unwrap_or_default();
    format!(
        r#"<div class="fieldkit-field fieldkit-field-{kind}"><label for="{id}">{label}{required}</label>{control}{description}</div>"#,
        kind = esc_attr(config.type_name()),
        id = input_id(config),
        label = esc_html(label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_attribute_and_text() {
        assert_eq!(esc_attr(r#"a"b"#), "a&quot;b");
        assert_eq!(esc_html("<b>"), "&lt;b&gt;");
    }

    #[test]
    fn input_name_override() {
        let config = FieldConfig::new("phone", "text").with_extra("input_name", json!("phone[]"));
        assert_eq!(input_name(&config), "phone[]");
        assert_eq!(input_id(&config), "phone");
    }

    #[test]
    fn wrap_marks_required_and_description() {
        let config = FieldConfig::new("title", "text")
            .required()
            .with_description("Shown in lists");
        let html = wrap(&config, "Title", "<input>");
        assert!(html.contains(r#"<label for="title">Title <span class="required">*</span></label>"#));
        assert!(html.contains(r#"<p class="description">Shown in lists</p>"#));
        assert!(html.contains("fieldkit-field-text"));
    }
}
