//! `fieldkit render` - print a resource's form.

use std::path::Path;

use anyhow::Result;
use fieldkit::{FormRenderer, Registry};
use fieldkit_config::FieldkitConfig;
use serde_json::json;

use crate::project::{load_document, open_router, resource_context};
use crate::EXIT_OK;

/// Render `resource` from the document at `path` with its stored values.
pub fn run_render(
    config: &FieldkitConfig,
    path: &Path,
    resource: &str,
    id: Option<&str>,
    json: bool,
) -> Result<i32> {
    let document = load_document(path)?;
    let (kind, decl) = document.resource(resource)?;
    let context = resource_context(kind, decl, id)?;
    let registry = Registry::new();
    let router = open_router(config);

    let form = FormRenderer::new(&registry, &router).render(&decl.fields, &context)?;
    if json {
        let output = json!({
            "context": context,
            "html": form.html,
            "assets": form.assets.handles().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", form.html);
    }
    Ok(EXIT_OK)
}
