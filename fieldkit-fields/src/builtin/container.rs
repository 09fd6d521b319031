//! Container fields: group, metabox, tabs and repeater.
//!
//! Containers own no value of their own. They carry nested declarations and
//! know how to frame the markup of those declarations; constructing and
//! rendering the nested fields themselves is left to the caller through a
//! [`ChildRenderer`].

use serde::Deserialize;
use serde_json::{json, Value};

use super::markup::{esc_attr, esc_html, input_id};
use crate::error::{FieldsError, Result};
use crate::field::{
    base_schema, AssetQueue, ChildRenderer, ContainerField, Field, FieldInstance, RenderedChild,
    RowBounds,
};
use crate::types::FieldConfig;

fn no_children(_: &FieldConfig, _: Option<usize>) -> RenderedChild {
    RenderedChild::default()
}

fn container_schema(field: &dyn ContainerField) -> Value {
    let mut schema = base_schema(field.config(), &field.label(), field.value_type());
    let nested: Vec<&FieldConfig> = field.nested_fields();
    schema["fields"] = serde_json::to_value(nested).unwrap_or(Value::Null);
    schema
}

fn description(config: &FieldConfig) -> String {
    config
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="description">{}</p>"#, esc_html(d)))
        .unwrap_or_default()
}

fn render_each(fields: &[FieldConfig], child: &mut ChildRenderer<'_>) -> String {
    fields.iter().map(|f| child(f, None).markup).collect()
}

/// Implements the value-less parts of [`Field`] shared by every container.
macro_rules! container_field_impl {
    ($ty:ty) => {
        impl Field for $ty {
            fn config(&self) -> &FieldConfig {
                &self.config
            }

            fn config_mut(&mut self) -> &mut FieldConfig {
                &mut self.config
            }

            /// Frame only; nested fields need a renderer that can build them.
            fn render(&self, _value: &Value) -> String {
                self.render_nested(&mut no_children)
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

            fn schema(&self) -> Value {
                container_schema(self)
            }

            fn enqueue_assets(&self, assets: &mut AssetQueue) {
                self.assets(assets);
            }
        }
    };
}

/// Visual grouping inside a `<fieldset>`.
#[derive(Debug)]
pub struct GroupField {
    config: FieldConfig,
}

impl GroupField {
    pub fn new(config: FieldConfig) -> Self {
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Container(Box::new(Self::new(config))))
    }

    fn assets(&self, _assets: &mut AssetQueue) {}
}

container_field_impl!(GroupField);

impl ContainerField for GroupField {
    fn nested_fields(&self) -> Vec<&FieldConfig> {
        self.config.fields.iter().collect()
    }

    fn render_nested(&self, child: &mut ChildRenderer<'_>) -> String {
        format!(
            r#"<fieldset class="fieldkit-group" id="{id}"><legend>{legend}</legend>{description}{children}</fieldset>"#,
            id = input_id(&self.config),
            legend = esc_html(&self.label()),
            description = description(&self.config),
            children = render_each(&self.config.fields, child),
        )
    }
}

/// An edit-screen box. `context` and `priority` tell the host where to place it.
#[derive(Debug)]
pub struct MetaboxField {
    config: FieldConfig,
}

impl MetaboxField {
    pub fn new(mut config: FieldConfig) -> Self {
        let title = config.label();
        config.merge_defaults(&[
            ("title", json!(title)),
            ("context", json!("normal")),
            ("priority", json!("default")),
        ]);
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Container(Box::new(Self::new(config))))
    }

    pub fn title(&self) -> &str {
        self.config.extra_str("title").unwrap_or_default()
    }

    pub fn placement(&self) -> &str {
        self.config.extra_str("context").unwrap_or("normal")
    }

    pub fn priority(&self) -> &str {
        self.config.extra_str("priority").unwrap_or("default")
    }

    fn assets(&self, _assets: &mut AssetQueue) {}
}

container_field_impl!(MetaboxField);

impl ContainerField for MetaboxField {
    fn nested_fields(&self) -> Vec<&FieldConfig> {
        self.config.fields.iter().collect()
    }

    fn render_nested(&self, child: &mut ChildRenderer<'_>) -> String {
        format!(
            r#"<div class="fieldkit-metabox postbox" id="{id}" data-context="{context}" data-priority="{priority}"><h2 class="hndle">{title}</h2><div class="inside">{description}{children}</div></div>"#,
            id = input_id(&self.config),
            context = esc_attr(self.placement()),
            priority = esc_attr(self.priority()),
            title = esc_html(self.title()),
            description = description(&self.config),
            children = render_each(&self.config.fields, child),
        )
    }
}

/// One panel of a [`TabsField`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tab {
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// Nested fields split across tab panels.
///
/// Panels come from `tabs: [{label, fields}]`. Plain `fields` on the
/// declaration become one more panel, labelled with the field's label.
#[derive(Debug)]
pub struct TabsField {
    config: FieldConfig,
    tabs: Vec<Tab>,
}

impl TabsField {
    pub fn new(config: FieldConfig) -> Result<Self> {
        let mut tabs: Vec<Tab> = match config.extra.get("tabs") {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                FieldsError::invalid_config(config.name(), format!("invalid tabs: {e}"))
            })?,
        };
        if !config.fields.is_empty() {
            tabs.push(Tab {
                label: config.label(),
                fields: config.fields.clone(),
            });
        }
        Ok(Self { config, tabs })
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Container(Box::new(Self::new(config)?)))
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn assets(&self, assets: &mut AssetQueue) {
        assets.enqueue("fieldkit-tabs");
    }
}

container_field_impl!(TabsField);

impl ContainerField for TabsField {
    fn nested_fields(&self) -> Vec<&FieldConfig> {
        self.tabs.iter().flat_map(|t| t.fields.iter()).collect()
    }

    fn render_nested(&self, child: &mut ChildRenderer<'_>) -> String {
        let id = input_id(&self.config);
        let mut nav = String::from(r#"<ul class="fieldkit-tabs-nav">"#);
        let mut panels = String::new();
        for (i, tab) in self.tabs.iter().enumerate() {
            let active = if i == 0 { " active" } else { "" };
            nav.push_str(&format!(
                r##"<li class="fieldkit-tab{active}"><a href="#{id}-tab-{i}">{label}</a></li>"##,
                label = esc_html(&tab.label),
            ));
            panels.push_str(&format!(
                r#"<div class="fieldkit-tab-panel{active}" id="{id}-tab-{i}">{children}</div>"#,
                children = render_each(&tab.fields, child),
            ));
        }
        nav.push_str("</ul>");
        format!(r#"<div class="fieldkit-tabs" id="{id}">{nav}{panels}</div>"#)
    }
}

/// A list of rows, each holding one copy of the nested fields.
///
/// Rows are rendered while the index is below `min` or any child reports a
/// stored value and produces markup, never past `max` (0 means unbounded). Nested inputs are
/// named `child[]` so a submission carries one array per child.
#[derive(Debug)]
pub struct RepeaterField {
    config: FieldConfig,
}

impl RepeaterField {
    pub fn new(mut config: FieldConfig) -> Self {
        config.merge_defaults(&[
            ("min", json!(0)),
            ("max", json!(0)),
            ("button_label", json!("Add Row")),
        ]);
        Self { config }
    }

    pub fn construct(config: FieldConfig) -> Result<FieldInstance> {
        Ok(FieldInstance::Container(Box::new(Self::new(config))))
    }

    pub fn min_rows(&self) -> usize {
        self.config.extra_u64("min").unwrap_or(0) as usize
    }

    /// `None` when unbounded.
    pub fn max_rows(&self) -> Option<usize> {
        match self.config.extra_u64("max").unwrap_or(0) {
            0 => None,
            n => Some(n as usize),
        }
    }

    /// Nested declarations as rendered inside a row.
    fn row_fields(&self) -> Vec<FieldConfig> {
        self.config
            .fields
            .iter()
            .map(|f| {
                let mut f = f.clone();
                let name = format!("{}[]", f.name());
                f.set("input_name", json!(name));
                f
            })
            .collect()
    }

    fn assets(&self, assets: &mut AssetQueue) {
        assets.enqueue("fieldkit-repeater");
    }
}

container_field_impl!(RepeaterField);

impl ContainerField for RepeaterField {
    fn nested_fields(&self) -> Vec<&FieldConfig> {
        self.config.fields.iter().collect()
    }

    fn render_nested(&self, child: &mut ChildRenderer<'_>) -> String {
        let fields = self.row_fields();
        let min = self.min_rows();
        let max = self.max_rows();
        let mut rows = String::new();
        let mut row = 0;
        while max.is_none_or(|max| row < max) {
            let rendered: Vec<RenderedChild> = fields.iter().map(|f| child(f, Some(row))).collect();
            let filled = rendered.iter().any(|c| c.has_value)
                && rendered.iter().any(|c| !c.markup.is_empty());
            if row >= min && !filled {
                break;
            }
            rows.push_str(&format!(
                r#"<div class="fieldkit-repeater-row" data-row="{row}">{}<button type="button" class="fieldkit-remove-row">&times;</button></div>"#,
                rendered.into_iter().map(|c| c.markup).collect::<String>(),
            ));
            row += 1;
        }
        format!(
            r#"<div class="fieldkit-repeater" id="{id}" data-min="{min}" data-max="{max}"><h4>{label}</h4>{description}<div class="fieldkit-repeater-rows">{rows}</div><button type="button" class="button fieldkit-add-row">{button}</button></div>"#,
            id = input_id(&self.config),
            max = max.unwrap_or(0),
            label = esc_html(&self.label()),
            description = description(&self.config),
            button = esc_html(self.config.extra_str("button_label").unwrap_or("Add Row")),
        )
    }
    fn row_bounds(&self) -> Option<RowBounds> {
        Some(RowBounds {
            min: self.min_rows(),
            max: self.max_rows(),
        })
    }
}
