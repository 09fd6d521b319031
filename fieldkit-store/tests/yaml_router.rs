//! The context router over YAML backends, reopened between steps.

use fieldkit_fields::{Context, StorageKey};
use fieldkit_store::ContextRouter;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn values_survive_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let mut router = ContextRouter::yaml(temp.path());
        router.set_field("price", "42", "post", json!(-5)).unwrap();
        router.set_field("color", "7", "term", json!("#ff0000")).unwrap();
        router
            .set_field("currency", "store-settings", "settings", json!("EUR"))
            .unwrap();
    }

    let router = ContextRouter::yaml(temp.path());
    assert_eq!(router.get_field("price", "42", "post", json!(0)).unwrap(), json!(-5));
    assert_eq!(
        router.get_field("color", "7", "term", json!(null)).unwrap(),
        json!("#ff0000")
    );
    assert_eq!(
        router
            .get_field("currency", "store-settings", "settings", json!("USD"))
            .unwrap(),
        json!("EUR")
    );
    assert!(temp.path().join("post/42.yaml").exists());
    assert!(temp.path().join("term/7.yaml").exists());
    assert!(temp.path().join("options.yaml").exists());
}

#[test]
fn settings_pages_share_one_option_file() {
    let temp = TempDir::new().unwrap();
    let mut router = ContextRouter::yaml(temp.path());
    router.set_field("title", "home", "settings", json!("Home")).unwrap();
    router.set_field("title", "about", "settings", json!("About")).unwrap();

    assert_eq!(router.keys(&Context::settings("home")).unwrap(), vec!["home_title"]);
    let about = StorageKey::derive("title", true, &Context::settings("about"));
    assert_eq!(router.raw(&about).unwrap(), Some(json!("About")));
}

#[test]
fn empty_store_reads_defaults() {
    let temp = TempDir::new().unwrap();
    let router = ContextRouter::yaml(temp.path().join("not-yet-created"));
    assert_eq!(
        router
            .get_field("currency", "store-settings", "settings", json!("USD"))
            .unwrap(),
        json!("USD")
    );
}
