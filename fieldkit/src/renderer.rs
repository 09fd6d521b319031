//! Form rendering.
//!
//! [`FormRenderer`] builds every declaration through the registry, reads each
//! leaf's stored value through the router (falling back to the declared
//! default), and lets containers frame their children. Inside a repeater the
//! stored value of a child is an array with one entry per row.

use fieldkit_fields::field::leaf_storage_key;
use fieldkit_fields::{
    AssetQueue, Context, Field, FieldConfig, FieldInstance, Registry, RenderedChild,
};
use fieldkit_store::ContextRouter;
use serde_json::Value;
use tracing::debug;

use crate::error::{FieldkitError, Result};

/// Markup for a field list plus the assets its fields asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedForm {
    pub html: String,
    pub assets: AssetQueue,
}

#[derive(Debug)]
pub struct FormRenderer<'a> {
    registry: &'a Registry,
    router: &'a ContextRouter,
}

fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl<'a> FormRenderer<'a> {
    pub fn new(registry: &'a Registry, router: &'a ContextRouter) -> Self {
        Self { registry, router }
    }

    /// Render `fields` with the values stored for `context`.
    ///
    /// Top-level declarations must construct; broken nested declarations are
    /// left out of the markup.
    pub fn render(&self, fields: &[FieldConfig], context: &Context) -> Result<RenderedForm> {
        let mut form = RenderedForm::default();
        for config in fields {
            let instance = self.registry.create(config.clone())?;
            let child = self.render_instance(&instance, context, None, &mut form.assets)?;
            form.html.push_str(&child.markup);
        }
        Ok(form)
    }

    /// The value a leaf displays: stored, else its declared default. With a
    /// row index the stored value is an array and the row's entry is used.
    pub fn value_for(&self, field: &dyn Field, context: &Context, row: Option<usize>) -> Result<Value> {
        let default = field.config().default.clone().unwrap_or(Value::Null);
        let key = leaf_storage_key(field, context);
        let stored = self.router.get_value(&key, default)?;
        Ok(match row {
            None => stored,
            Some(i) => match stored {
                Value::Array(mut items) if i < items.len() => items.swap_remove(i),
                _ => Value::Null,
            },
        })
    }

    fn render_instance(
        &self,
        instance: &FieldInstance,
        context: &Context,
        row: Option<usize>,
        assets: &mut AssetQueue,
    ) -> Result<RenderedChild> {
        match instance {
            FieldInstance::Leaf(field) => {
                field.enqueue_assets(assets);
                let value = self.value_for(field.as_ref(), context, row)?;
                Ok(RenderedChild {
                    markup: field.render(&value),
                    has_value: has_value(&value),
                })
            }
            FieldInstance::Container(container) => {
                container.enqueue_assets(assets);
                let mut failure: Option<FieldkitError> = None;
                let mut any_value = false;
                let markup = container.render_nested(&mut |config, child_row| {
                    if failure.is_some() {
                        return RenderedChild::default();
                    }
                    match self.render_declaration(config, context, child_row.or(row), assets) {
                        Ok(child) => {
                            any_value |= child.has_value;
                            child
                        }
                        Err(e) => {
                            failure = Some(e);
                            RenderedChild::default()
                        }
                    }
                });
                match failure {
                    Some(e) => Err(e),
                    None => Ok(RenderedChild {
                        markup,
                        has_value: any_value,
                    }),
                }
            }
        }
    }

    fn render_declaration(
        &self,
        config: &FieldConfig,
        context: &Context,
        row: Option<usize>,
        assets: &mut AssetQueue,
    ) -> Result<RenderedChild> {
        if !config.has_name() {
            return Ok(RenderedChild::default());
        }
        match self.registry.create(config.clone()) {
            Ok(instance) => self.render_instance(&instance, context, row, assets),
            Err(e) => {
                debug!(field = config.name(), error = %e, "skipping nested field that failed to construct");
                Ok(RenderedChild::default())
            }
        }
    }
}
