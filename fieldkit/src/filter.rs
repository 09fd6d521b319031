//! Before-save filters.
//!
//! Global filters run first, in registration order, and see every field. Any
//! of them may return [`FilterOutcome::Skip`], which stops filtering and keeps
//! the field out of the save entirely. Field filters run next, in order, for
//! the field they were registered under.

use fieldkit_fields::Context;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

/// What a global filter decided for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// Continue with this value
    Keep(Value),
    /// Do not persist this field
    Skip,
}

/// `(value, field name, context)` -> replacement or skip.
pub type GlobalFilter = Box<dyn Fn(Value, &str, &Context) -> FilterOutcome>;

/// `(value, context)` -> replacement.
pub type FieldFilter = Box<dyn Fn(Value, &Context) -> Value>;

#[derive(Default)]
pub struct Filters {
    global: Vec<GlobalFilter>,
    per_field: IndexMap<String, Vec<FieldFilter>>,
}

impl std::fmt::Debug for Filters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filters")
            .field("global", &self.global.len())
            .field("per_field", &self.per_field.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global(
        &mut self,
        filter: impl Fn(Value, &str, &Context) -> FilterOutcome + 'static,
    ) -> &mut Self {
        self.global.push(Box::new(filter));
        self
    }

    pub fn add_field(
        &mut self,
        field_name: impl Into<String>,
        filter: impl Fn(Value, &Context) -> Value + 'static,
    ) -> &mut Self {
        self.per_field
            .entry(field_name.into())
            .or_default()
            .push(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.per_field.is_empty()
    }

    /// Run every applicable filter over `value`.
    pub fn apply(&self, field_name: &str, value: Value, context: &Context) -> FilterOutcome {
        let mut value = value;
        for filter in &self.global {
            match filter(value, field_name, context) {
                FilterOutcome::Keep(next) => value = next,
                FilterOutcome::Skip => {
                    trace!(field = field_name, %context, "global filter skipped field");
                    return FilterOutcome::Skip;
                }
            }
        }
        if let Some(filters) = self.per_field.get(field_name) {
            for filter in filters {
                value = filter(value, context);
            }
        }
        FilterOutcome::Keep(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn no_filters_keep_value() {
        let filters = Filters::new();
        assert!(filters.is_empty());
        assert_eq!(
            filters.apply("a", json!(1), &Context::post(1)),
            FilterOutcome::Keep(json!(1))
        );
    }

    #[test]
    fn global_then_field_filters_in_order() {
        let mut filters = Filters::new();
        filters
            .add_global(|v, _, _| FilterOutcome::Keep(json!(format!("{}g", v.as_str().unwrap_or_default()))))
            .add_field("title", |v, _| json!(format!("{}1", v.as_str().unwrap_or_default())))
            .add_field("title", |v, _| json!(format!("{}2", v.as_str().unwrap_or_default())));
        assert_eq!(
            filters.apply("title", json!("x"), &Context::post(1)),
            FilterOutcome::Keep(json!("xg12"))
        );
        assert_eq!(
            filters.apply("other", json!("x"), &Context::post(1)),
            FilterOutcome::Keep(json!("xg"))
        );
    }

    #[test]
    fn skip_short_circuits_field_filters() {
        let ran = Rc::new(Cell::new(false));
        let seen = Rc::clone(&ran);
        let mut filters = Filters::new();
        filters
            .add_global(|v, name, _| {
                if name == "secret" {
                    FilterOutcome::Skip
                } else {
                    FilterOutcome::Keep(v)
                }
            })
            .add_field("secret", move |v, _| {
                seen.set(true);
                v
            });
        assert_eq!(
            filters.apply("secret", json!("x"), &Context::settings("s")),
            FilterOutcome::Skip
        );
        assert!(!ran.get());
    }

    #[test]
    fn global_filter_sees_context() {
        let mut filters = Filters::new();
        filters.add_global(|v, _, ctx| {
            if ctx.id == "locked" {
                FilterOutcome::Skip
            } else {
                FilterOutcome::Keep(v)
            }
        });
        assert_eq!(
            filters.apply("a", json!(1), &Context::post("locked")),
            FilterOutcome::Skip
        );
    }
}
