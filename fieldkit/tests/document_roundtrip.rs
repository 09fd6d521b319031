//! A document driven through registration, save and render against YAML storage.

use fieldkit::{
    Context, ContextRouter, Document, FormRenderer, MemoryRegistrar, Registry, ResourceKind,
    SavePipeline, Submission,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use test_log::test;

const STORE: &str = r#"
cpts:
  - id: product
    args:
      public: true
    fields:
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
      - name: notice
        type: custom_html
        content: "<p>Prices include tax.</p>"
taxonomies:
  - id: brand
    object_type: [product]
    fields:
      - { name: accent, type: color }
settings_pages:
  - id: store-settings
    fields:
      - name: currency
        type: select
        default: USD
        options:
          USD: Dollar
          EUR: Euro
"#;

fn submission(pairs: &[(&str, Value)]) -> Submission {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn register_save_and_render_product() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::new();
    let doc = Document::from_yaml_str(STORE).unwrap();
    doc.validate(&registry).unwrap();

    let mut registrar = MemoryRegistrar::new();
    let report = doc.register(&mut registrar).unwrap();
    assert_eq!(report.registered.len(), 3);
    assert!(report.existing.is_empty());

    let (kind, product) = doc.resource("product").unwrap();
    assert_eq!(kind, ResourceKind::PostType);
    let context = Context::post(42);
    {
        let mut router = ContextRouter::yaml(temp.path());
        let report = SavePipeline::new(&registry)
            .save(
                &product.fields,
                &submission(&[("price", json!("-5")), ("sku", json!(" AB-1 "))]),
                &context,
                &mut router,
            )
            .unwrap();
        assert_eq!(report.saved, vec!["sku"]);
        assert_eq!(report.errors[0].message, "Price must be at least 0.");
    }

    let router = ContextRouter::yaml(temp.path());
    assert_eq!(router.get_field("sku", "42", "post", json!(null)).unwrap(), json!("AB-1"));
    assert_eq!(router.get_field("price", "42", "post", json!("none")).unwrap(), json!("none"));

    let form = FormRenderer::new(&registry, &router)
        .render(&product.fields, &context)
        .unwrap();
    assert!(form.html.contains("Product Details"));
    assert!(form.html.contains(r#"value="AB-1""#));
    assert!(form.html.contains("<p>Prices include tax.</p>"));
}

#[test]
fn settings_page_uses_prefixed_option_keys() {
    let temp = TempDir::new().unwrap();
    let registry = Registry::new();
    let doc = Document::from_yaml_str(STORE).unwrap();
    let (kind, page) = doc.resource("store-settings").unwrap();
    let context = Context::new(kind.context_type(), "store-settings");

    let mut router = ContextRouter::yaml(temp.path());
    let before = FormRenderer::new(&registry, &router)
        .render(&page.fields, &context)
        .unwrap();
    assert!(before.html.contains(r#"<option value="USD" selected>"#));

    let report = SavePipeline::new(&registry)
        .save(&page.fields, &submission(&[("currency", json!("EUR"))]), &context, &mut router)
        .unwrap();
    assert_eq!(report.saved, vec!["store-settings_currency"]);
    assert_eq!(
        router.keys(&context).unwrap(),
        vec!["store-settings_currency".to_string()]
    );

    let after = FormRenderer::new(&registry, &router)
        .render(&page.fields, &context)
        .unwrap();
    assert!(after.html.contains(r#"<option value="EUR" selected>"#));
}

#[test]
fn field_sets_cover_every_resource_with_fields() {
    let doc = Document::from_yaml_str(STORE).unwrap();
    let sets: Vec<_> = doc
        .field_sets()
        .iter()
        .map(|set| (set.context_type().as_str(), set.resource_id))
        .collect();
    assert_eq!(
        sets,
        vec![("post", "product"), ("term", "brand"), ("settings", "store-settings")]
    );
    assert!(doc.collisions(&Registry::new()).unwrap().is_empty());
}
