//! `fieldkit types` - list registered field types.

use anyhow::Result;
use fieldkit::{FieldConfig, Registry};
use fieldkit_fields::{Field, FieldInstance};
use serde::Serialize;

use crate::table::new_table;
use crate::EXIT_OK;

#[derive(Debug, Serialize)]
struct TypeInfo {
    name: String,
    container: bool,
    value_type: &'static str,
    capabilities: Vec<String>,
}

/// Instantiate every registered type with a bare declaration.
fn describe(registry: &Registry) -> Vec<TypeInfo> {
    registry
        .registered_types()
        .into_iter()
        .filter_map(|name| {
            let def = registry.get_type(&name)?;
            let instance = registry.create(FieldConfig::new("sample", name.clone())).ok()?;
            Some(TypeInfo {
                container: matches!(instance, FieldInstance::Container(_)),
                value_type: instance.field().value_type(),
                capabilities: def.capabilities().iter().map(ToString::to_string).collect(),
                name,
            })
        })
        .collect()
}

pub fn run_types(json: bool) -> Result<i32> {
    let types = describe(&Registry::with_defaults());

    if json {
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(EXIT_OK);
    }

    let mut table = new_table(["Type", "Kind", "Value", "Capabilities"]);
    for info in &types {
        table.add_row(vec![
            info.name.clone(),
            if info.container { "container" } else { "leaf" }.to_string(),
            info.value_type.to_string(),
            info.capabilities.join(", "),
        ]);
    }
    println!("{table}");
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_every_builtin() {
        let types = describe(&Registry::with_defaults());
        assert_eq!(types.len(), 18);
        let repeater = types.iter().find(|t| t.name == "repeater").unwrap();
        assert!(repeater.container);
        assert_eq!(repeater.value_type, "null");
        let checkbox = types.iter().find(|t| t.name == "checkbox").unwrap();
        assert!(!checkbox.container);
        assert_eq!(checkbox.capabilities.len(), 4);
    }
}
