//! `fieldkit check` - validate a document.

use std::path::Path;

use anyhow::Result;
use fieldkit::Registry;
use serde_json::json;

use crate::project::load_document;
use crate::table::new_table;
use crate::EXIT_OK;

/// Validate the document at `path` and list its resources.
///
/// Name collisions are reported but do not fail the check.
pub fn run_check(path: &Path, json: bool) -> Result<i32> {
    let document = load_document(path)?;
    let registry = Registry::new();
    document.validate(&registry)?;
    let collisions = document.collisions(&registry)?;

    if json {
        let resources: Vec<_> = document
            .resources()
            .map(|(kind, resource)| {
                json!({
                    "kind": kind,
                    "id": resource.id(),
                    "context_type": kind.context_type(),
                    "fields": resource.fields.len(),
                })
            })
            .collect();
        let output = json!({ "resources": resources, "collisions": collisions });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(EXIT_OK);
    }

    let mut table = new_table(["Kind", "Id", "Storage", "Fields"]);
    for (kind, resource) in document.resources() {
        table.add_row(vec![
            kind.to_string(),
            resource.id().to_string(),
            kind.context_type().to_string(),
            resource.fields.len().to_string(),
        ]);
    }
    println!("{table}");
    for collision in &collisions {
        println!(
            "warning: '{}' is declared {} times on {} '{}'",
            collision.name, collision.count, collision.kind, collision.resource_id
        );
    }
    println!("{} ok", path.display());
    Ok(EXIT_OK)
}
