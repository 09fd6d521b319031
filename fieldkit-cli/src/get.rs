//! `fieldkit get` - read one stored value.

use anyhow::Result;
use fieldkit_config::FieldkitConfig;
use serde_json::Value;

use crate::project::{open_router, parse_value};
use crate::EXIT_OK;

/// Print the value of `name` for `id`. Strings are printed as text, other
/// values as JSON. An unknown context type prints the default.
pub fn run_get(
    config: &FieldkitConfig,
    name: &str,
    id: &str,
    context_type: Option<&str>,
    default: Option<&str>,
) -> Result<i32> {
    let context_type = context_type.unwrap_or(config.default_context_type.as_str());
    let default = default.map(parse_value).unwrap_or(Value::Null);
    let router = open_router(config);

    let value = router.get_field(name, id, context_type, default)?;
    match value {
        Value::String(text) => println!("{text}"),
        other => println!("{}", serde_json::to_string(&other)?),
    }
    Ok(EXIT_OK)
}
