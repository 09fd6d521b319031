//! Integration tests for the `fieldkit` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STORE: &str = r#"
cpts:
  - id: product
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

/// A project directory with the store document and YAML storage configured.
fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("store.yaml"), STORE).unwrap();
    fs::write(
        temp.path().join("fieldkit.toml"),
        "[storage]\nbackend = \"yaml\"\npath = \"data\"\n",
    )
    .unwrap();
    temp
}

fn fieldkit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fieldkit").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("FIELDKIT_STORAGE__BACKEND")
        .env_remove("FIELDKIT_STORAGE__PATH")
        .env_remove("FIELDKIT_LOG_LEVEL");
    cmd
}

#[test]
fn types_lists_builtins() {
    let temp = TempDir::new().unwrap();
    fieldkit(temp.path())
        .args(["types", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"repeater\""))
        .stdout(predicate::str::contains("\"custom_html\""));
}

#[test]
fn check_accepts_valid_document() {
    let temp = project();
    fieldkit(temp.path())
        .args(["check", "store.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("product"))
        .stdout(predicate::str::contains("store-settings"));
}

#[test]
fn check_rejects_unknown_field_type() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("bad.yaml"),
        "cpts:\n  - id: book\n    fields:\n      - { name: x, type: hologram }\n",
    )
    .unwrap();
    fieldkit(temp.path())
        .args(["check", "bad.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown field type: hologram"));
}

#[test]
fn check_reports_collisions_in_json() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("dup.json"),
        r#"{"cpts": [{"id": "event", "fields": [
            {"name": "title", "type": "text"},
            {"name": "more", "type": "group", "fields": [{"name": "title", "type": "text"}]}
        ]}]}"#,
    )
    .unwrap();
    fieldkit(temp.path())
        .args(["check", "dup.json", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"title\""))
        .stdout(predicate::str::contains("\"count\": 2"));
}

#[test]
fn save_reports_invalid_fields_and_keeps_valid_ones() {
    let temp = project();
    fieldkit(temp.path())
        .args([
            "save",
            "store.yaml",
            "product",
            "--id",
            "42",
            "--input",
            r#"{"price": "-5", "sku": "AB-1"}"#,
            "--json",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Price must be at least 0."));

    fieldkit(temp.path())
        .args(["get", "sku", "42"])
        .assert()
        .success()
        .stdout("AB-1\n");
    fieldkit(temp.path())
        .args(["get", "price", "42", "--default", "0"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn save_then_render_settings_page() {
    let temp = project();
    fieldkit(temp.path())
        .args(["save", "store.yaml", "store-settings", "--input", r#"{"currency": "EUR"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("store-settings_currency"));

    fieldkit(temp.path())
        .args(["render", "store.yaml", "store-settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"<option value="EUR" selected>"#));

    fieldkit(temp.path())
        .args(["get", "currency", "store-settings", "--context-type", "settings"])
        .assert()
        .success()
        .stdout("EUR\n");
}

#[test]
fn render_post_type_requires_id() {
    let temp = project();
    fieldkit(temp.path())
        .args(["render", "store.yaml", "product"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--id is required"));
}

#[test]
fn get_with_unknown_context_type_returns_default() {
    let temp = project();
    fieldkit(temp.path())
        .args(["get", "x", "1", "--context-type", "comment", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn invalid_configuration_fails_before_running() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("fieldkit.toml"), "log_level = \"chatty\"\n").unwrap();
    fieldkit(temp.path())
        .arg("types")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("log_level"));
}
