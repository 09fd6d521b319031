//! End-to-end tests: declarations parsed from YAML through the registry.

use fieldkit_fields::{
    leaves, Context, FieldConfig, FieldInstance, FieldTypeDef, Registry, StorageKey,
};
use indexmap::IndexMap;
use serde_json::json;

const PRODUCT_FIELDS: &str = r#"
- name: details
  type: metabox
  title: Product Details
  fields:
    - name: price
      type: number
      required: true
      validation:
        min: 0
    - name: sku
      type: text
      validation:
        pattern: "^[A-Z]{3}-[0-9]+$"
- name: gallery
  type: repeater
  max: 4
  fields:
    - name: image
      type: upload
- name: notice
  type: custom_html
  content: "<hr>"
"#;

fn product_fields() -> Vec<FieldConfig> {
    serde_yaml_ng::from_str(PRODUCT_FIELDS).unwrap()
}

#[test]
fn yaml_tree_expands_to_leaves() {
    let registry = Registry::new();
    let instances: Vec<FieldInstance> = product_fields()
        .into_iter()
        .map(|config| registry.create(config).unwrap())
        .collect();
    assert!(instances[0].is_container());
    assert!(instances[1].is_container());
    assert!(!instances[2].is_container());

    let names: Vec<String> = leaves(&registry, instances)
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    assert_eq!(names, vec!["price", "sku", "image", "notice"]);
}

#[test]
fn nested_leaf_validates_sanitized_input() {
    let registry = Registry::new();
    let config = product_fields().remove(0);
    let instance = registry.create(config).unwrap();
    let leaves = leaves(&registry, [instance]);

    let sku = &leaves[1];
    let clean = sku.sanitize(json!(" <b>ABC-12</b> "));
    assert_eq!(clean, json!("ABC-12"));
    assert!(sku.validate(&clean).valid);
    assert_eq!(
        sku.validate(&json!("abc")).errors,
        vec!["Sku format is invalid."]
    );
}

#[test]
fn storage_keys_follow_context() {
    let registry = Registry::new();
    let field = registry
        .create(FieldConfig::new("currency", "select"))
        .unwrap();
    let settings = Context::settings("store-settings");
    assert_eq!(
        field.storage_key(&settings).unwrap().key(),
        "store-settings_currency"
    );
    assert_eq!(field.storage_key(&Context::post(42)).unwrap().key(), "currency");

    let bare = registry
        .create(FieldConfig::new("currency", "select").without_name_prefix())
        .unwrap();
    assert_eq!(bare.storage_key(&settings).unwrap().key(), "currency");

    let group = registry.create(FieldConfig::new("box", "group")).unwrap();
    assert_eq!(group.storage_key(&settings), None::<StorageKey>);
}

#[test]
fn schema_describes_whole_tree() {
    let registry = Registry::new();
    let instance = registry.create(product_fields().remove(1)).unwrap();
    let schema = instance.field().schema();
    assert_eq!(schema["type"], "repeater");
    assert_eq!(schema["max"], 4);
    assert_eq!(schema["fields"][0]["name"], "image");
}

#[test]
fn host_type_registered_before_seeding_wins() {
    let registry = Registry::new();
    registry
        .register_type(
            "text",
            FieldTypeDef::new(fieldkit_fields::builtin::TextareaField::construct),
        )
        .unwrap();
    let mut configs = IndexMap::new();
    configs.insert("bio".to_string(), FieldConfig::new("bio", "text"));
    let fields = registry.create_multiple(configs).unwrap();
    assert!(fields["bio"].field().render(&json!("")).contains("<textarea"));
}
