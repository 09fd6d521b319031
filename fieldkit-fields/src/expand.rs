//! Recursive container expansion.
//!
//! Walks a field tree depth-first in declaration order and hands every leaf
//! to a callback. Nested declarations are constructed through the registry as
//! they are reached. A nested declaration that has no name, or that fails to
//! construct, is skipped; its siblings are still visited.

use tracing::{debug, trace};

use crate::field::{ContainerField, Field, FieldInstance, RowBounds};
use crate::registry::Registry;

/// A leaf reached by expansion. `rows` holds the limits of the innermost
/// repeater around it; such a leaf stores one array entry per row.
#[derive(Debug)]
pub struct ExpandedLeaf {
    pub field: Box<dyn Field>,
    pub rows: Option<RowBounds>,
}

impl ExpandedLeaf {
    pub fn is_repeated(&self) -> bool {
        self.rows.is_some()
    }
}

/// Visit the leaves of `instance` in pre-order. A leaf visits itself.
pub fn for_each_leaf(
    registry: &Registry,
    instance: FieldInstance,
    visit: &mut dyn FnMut(ExpandedLeaf),
) {
    walk(registry, instance, None, visit);
}

/// Visit every leaf nested anywhere under `container`.
pub fn expand(
    registry: &Registry,
    container: &dyn ContainerField,
    visit: &mut dyn FnMut(ExpandedLeaf),
) {
    descend(registry, container, container.row_bounds(), visit);
}

fn walk(
    registry: &Registry,
    instance: FieldInstance,
    rows: Option<RowBounds>,
    visit: &mut dyn FnMut(ExpandedLeaf),
) {
    match instance {
        FieldInstance::Leaf(field) => visit(ExpandedLeaf { field, rows }),
        FieldInstance::Container(container) => {
            let rows = container.row_bounds().or(rows);
            descend(registry, container.as_ref(), rows, visit);
        }
    }
}

fn descend(
    registry: &Registry,
    container: &dyn ContainerField,
    rows: Option<RowBounds>,
    visit: &mut dyn FnMut(ExpandedLeaf),
) {
    for config in container.nested_fields() {
        if !config.has_name() {
            trace!(
                container = container.name(),
                "skipping nested declaration without a name"
            );
            continue;
        }
        match registry.create(config.clone()) {
            Ok(instance) => walk(registry, instance, rows, visit),
            Err(e) => debug!(
                container = container.name(),
                field = config.name(),
                error = %e,
                "skipping nested field that failed to construct"
            ),
        }
    }
}

/// All leaves under `instances`, in visit order, with their row limits.
pub fn expanded(
    registry: &Registry,
    instances: impl IntoIterator<Item = FieldInstance>,
) -> Vec<ExpandedLeaf> {
    let mut out = Vec::new();
    for instance in instances {
        for_each_leaf(registry, instance, &mut |leaf| out.push(leaf));
    }
    out
}

/// All leaves under `instances`, in visit order.
pub fn leaves(
    registry: &Registry,
    instances: impl IntoIterator<Item = FieldInstance>,
) -> Vec<Box<dyn Field>> {
    expanded(registry, instances)
        .into_iter()
        .map(|leaf| leaf.field)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldConfig;
    use test_log::test;

    fn text(name: &str) -> FieldConfig {
        FieldConfig::new(name, "text")
    }

    fn visited(registry: &Registry, config: FieldConfig) -> Vec<String> {
        let instance = registry.create(config).unwrap();
        leaves(registry, [instance])
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    #[test]
    fn visits_nested_leaves_in_declaration_order() {
        let registry = Registry::new();
        let tree = FieldConfig::new("outer", "group").with_fields(vec![
            text("a"),
            FieldConfig::new("inner", "group").with_fields(vec![text("b"), text("c")]),
            text("d"),
        ]);
        assert_eq!(visited(&registry, tree), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn leaf_visits_itself() {
        let registry = Registry::new();
        assert_eq!(visited(&registry, text("solo")), vec!["solo"]);
    }

    #[test]
    fn nameless_nested_entry_is_skipped() {
        let registry = Registry::new();
        let nameless = FieldConfig {
            type_: Some("text".into()),
            ..FieldConfig::default()
        };
        let tree = FieldConfig::new("box", "metabox").with_fields(vec![text("a"), nameless, text("b")]);
        assert_eq!(visited(&registry, tree), vec!["a", "b"]);
    }

    #[test]
    fn unknown_nested_type_is_skipped() {
        let registry = Registry::new();
        let tree = FieldConfig::new("box", "group").with_fields(vec![
            FieldConfig::new("ghost", "hologram"),
            text("real"),
        ]);
        assert_eq!(visited(&registry, tree), vec!["real"]);
    }

    #[test]
    fn tabs_expand_across_panels() {
        let registry = Registry::new();
        let tree = FieldConfig::new("layout", "tabs").with_extra(
            "tabs",
            serde_json::json!([
                {"label": "One", "fields": [{"name": "x", "type": "text"}]},
                {"label": "Two", "fields": [{"name": "y", "type": "repeater", "fields": [{"name": "z", "type": "text"}]}]}
            ]),
        );
        assert_eq!(visited(&registry, tree), vec!["x", "z"]);
    }

    #[test]
    fn repeated_leaves_carry_innermost_row_limits() {
        let registry = Registry::new();
        let tree = FieldConfig::new("outer", "group").with_fields(vec![
            text("plain"),
            FieldConfig::new("phones", "repeater")
                .with_extra("min", serde_json::json!(1))
                .with_fields(vec![
                    text("number"),
                    FieldConfig::new("extra", "group").with_fields(vec![text("note")]),
                ]),
        ]);
        let instance = registry.create(tree).unwrap();
        let leaves = expanded(&registry, [instance]);
        let summary: Vec<_> = leaves
            .iter()
            .map(|l| (l.field.name().to_string(), l.rows.map(|r| r.min)))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("plain".to_string(), None),
                ("number".to_string(), Some(1)),
                ("note".to_string(), Some(1)),
            ]
        );
        assert!(!leaves[0].is_repeated());
        assert!(leaves[2].is_repeated());
    }
}
