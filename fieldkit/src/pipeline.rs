//! The save pipeline.
//!
//! Every top-level declaration is constructed before anything is written, so
//! a malformed declaration fails the whole save up front. Leaves are then
//! processed one at a time in expansion order: filter, sanitize, validate the
//! sanitized value, then either persist it or record an error. One field's
//! failure, including a storage failure, never stops its siblings.
//!
//! Leaves inside a repeater receive one array entry per row. The row count is
//! checked against the repeater's limits and each entry is sanitized and
//! validated on its own; the cleaned array is stored only when every row
//! passes.

use std::collections::HashSet;

use fieldkit_fields::field::leaf_storage_key;
use fieldkit_fields::{
    expanded, Context, ExpandedLeaf, Field, FieldConfig, FieldInstance, Registry, RowBounds,
    ValidationResult,
};
use fieldkit_store::ContextRouter;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::filter::{FilterOutcome, Filters};

/// One field that could not be saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Storage key the value would have been written to
    pub key: String,
    pub label: String,
    /// All validation messages joined with spaces, or the storage error
    pub message: String,
}

/// Outcome of one save pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveReport {
    /// Storage keys written, in processing order
    pub saved: Vec<String>,
    /// Fields a global filter kept out of the save
    pub skipped: Vec<String>,
    /// Fields that failed validation
    pub errors: Vec<FieldError>,
    /// Valid fields the backend refused to store
    pub failed: Vec<FieldError>,
}

impl SaveReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.failed.is_empty()
    }
}

/// Submitted values keyed by field name.
pub type Submission = IndexMap<String, Value>;

/// Runs submissions through filters, sanitizers and validators into a router.
#[derive(Debug)]
pub struct SavePipeline<'a> {
    registry: &'a Registry,
    filters: Filters,
}

impl<'a> SavePipeline<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            filters: Filters::new(),
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    /// Save `submission` for `fields` in `context`.
    ///
    /// A field absent from the submission is processed as null. Fields that
    /// fail validation, or that the backend refuses, keep whatever value was
    /// stored before.
    pub fn save(
        &self,
        fields: &[FieldConfig],
        submission: &Submission,
        context: &Context,
        router: &mut ContextRouter,
    ) -> Result<SaveReport> {
        self.save_with(fields, submission, context, router, |_| {})
    }

    /// Like [`save`](Self::save), calling `on_leaf` for every leaf as it is
    /// reached, before filtering.
    pub fn save_with(
        &self,
        fields: &[FieldConfig],
        submission: &Submission,
        context: &Context,
        router: &mut ContextRouter,
        mut on_leaf: impl FnMut(&dyn Field),
    ) -> Result<SaveReport> {
        let instances = fields
            .iter()
            .map(|config| self.registry.create(config.clone()))
            .collect::<fieldkit_fields::Result<Vec<FieldInstance>>>()?;

        let mut report = SaveReport::default();
        let mut seen = HashSet::new();
        for leaf in expanded(self.registry, instances) {
            on_leaf(leaf.field.as_ref());
            if !leaf.field.persists() {
                trace!(field = leaf.field.name(), "display-only field, not saved");
                continue;
            }
            if !seen.insert(leaf.field.name().to_string()) {
                warn!(
                    field = leaf.field.name(),
                    %context,
                    "field name declared more than once; the later value overwrites"
                );
            }
            self.save_leaf(&leaf, submission, context, router, &mut report);
        }
        debug!(
            %context,
            saved = report.saved.len(),
            skipped = report.skipped.len(),
            errors = report.errors.len(),
            failed = report.failed.len(),
            "save finished"
        );
        Ok(report)
    }

    fn save_leaf(
        &self,
        leaf: &ExpandedLeaf,
        submission: &Submission,
        context: &Context,
        router: &mut ContextRouter,
        report: &mut SaveReport,
    ) {
        let field = leaf.field.as_ref();
        let name = field.name();
        let raw = submission.get(name).cloned().unwrap_or(Value::Null);
        let value = match self.filters.apply(name, raw, context) {
            FilterOutcome::Keep(value) => value,
            FilterOutcome::Skip => {
                report.skipped.push(name.to_string());
                return;
            }
        };

        let (clean, result) = match leaf.rows {
            Some(rows) => clean_rows(field, rows, value),
            None => {
                let clean = field.sanitize(value);
                let result = field.validate(&clean);
                (clean, result)
            }
        };
        let key = leaf_storage_key(field, context);
        if !result.valid {
            debug!(%key, errors = ?result.errors, "field failed validation");
            report.errors.push(FieldError {
                key: key.key().to_string(),
                label: field.label(),
                message: result.message(),
            });
            return;
        }
        match router.set_value(&key, clean) {
            Ok(()) => {
                trace!(%key, "saved field");
                report.saved.push(key.key().to_string());
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to store field");
                report.failed.push(FieldError {
                    key: key.key().to_string(),
                    label: field.label(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Sanitize and validate a repeated leaf row by row.
///
/// Null is zero rows and a lone scalar is one row. Row messages are prefixed
/// with their 1-based row number.
fn clean_rows(field: &dyn Field, rows: RowBounds, value: Value) -> (Value, ValidationResult) {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    if let Some(message) = rows.check(&field.label(), items.len()) {
        return (Value::Null, ValidationResult::from_errors(vec![message]));
    }

    let mut errors = Vec::new();
    let mut cleaned = Vec::with_capacity(items.len());
    for (row, item) in items.into_iter().enumerate() {
        let clean = field.sanitize(item);
        let result = field.validate(&clean);
        errors.extend(
            result
                .errors
                .into_iter()
                .map(|message| format!("Row {}: {message}", row + 1)),
        );
        cleaned.push(clean);
    }
    (Value::Array(cleaned), ValidationResult::from_errors(errors))
}
