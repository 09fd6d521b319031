//! YAML file backends
//!
//! Layout under a store root:
//!
//! ```text
//! {root}/post/{id}.yaml    one mapping per post
//! {root}/term/{id}.yaml    one mapping per term
//! {root}/options.yaml      every settings value
//! ```
//!
//! Files are read on every access and rewritten atomically on every change.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;
use ulid::Ulid;

use crate::backend::{MetaStore, OptionStore};
use crate::error::{Result, StoreError};

type Values = IndexMap<String, Value>;

fn load(path: &Path) -> Result<Values> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Values::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    if text.trim().is_empty() {
        return Ok(Values::new());
    }
    serde_yaml_ng::from_str(&text).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn save(path: &Path, values: &Values) -> Result<()> {
    let yaml = serde_yaml_ng::to_string(values)?;
    atomic_write(path, yaml.as_bytes())
}

/// Write to a temp file then rename for atomic persistence.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| StoreError::io(path, std::io::Error::new(ErrorKind::InvalidInput, "no parent dir")))?;
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Object ids become file names, so they may not contain path syntax.
fn check_id(object_id: &str) -> Result<()> {
    let bad = object_id.is_empty()
        || object_id.starts_with('.')
        || object_id.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidId(object_id.to_string()));
    }
    Ok(())
}

/// [`MetaStore`] keeping one YAML file per object under `{root}/{scope}/`.
#[derive(Debug, Clone)]
pub struct YamlMetaStore {
    dir: PathBuf,
}

impl YamlMetaStore {
    pub fn new(root: impl AsRef<Path>, scope: &str) -> Self {
        Self {
            dir: root.as_ref().join(scope),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn object_path(&self, object_id: &str) -> Result<PathBuf> {
        check_id(object_id)?;
        Ok(self.dir.join(format!("{object_id}.yaml")))
    }
}

impl MetaStore for YamlMetaStore {
    fn get(&self, object_id: &str, key: &str) -> Result<Option<Value>> {
        let path = self.object_path(object_id)?;
        Ok(load(&path)?.shift_remove(key))
    }

    fn set(&mut self, object_id: &str, key: &str, value: Value) -> Result<()> {
        let path = self.object_path(object_id)?;
        let mut values = load(&path)?;
        values.insert(key.to_string(), value);
        save(&path, &values)?;
        debug!(path = %path.display(), key, "wrote meta value");
        Ok(())
    }

    fn delete(&mut self, object_id: &str, key: &str) -> Result<bool> {
        let path = self.object_path(object_id)?;
        let mut values = load(&path)?;
        if values.shift_remove(key).is_none() {
            return Ok(false);
        }
        save(&path, &values)?;
        Ok(true)
    }

    fn keys(&self, object_id: &str) -> Result<Vec<String>> {
        let path = self.object_path(object_id)?;
        Ok(load(&path)?.into_keys().collect())
    }
}

/// [`OptionStore`] backed by a single `options.yaml`.
#[derive(Debug, Clone)]
pub struct YamlOptionStore {
    path: PathBuf,
}

impl YamlOptionStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join("options.yaml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OptionStore for YamlOptionStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(load(&self.path)?.shift_remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut values = load(&self.path)?;
        values.insert(key.to_string(), value);
        save(&self.path, &values)?;
        debug!(path = %self.path.display(), key, "wrote option");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let mut values = load(&self.path)?;
        if values.shift_remove(key).is_none() {
            return Ok(false);
        }
        save(&self.path, &values)?;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(load(&self.path)?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn meta_roundtrip_creates_scope_directory() {
        let temp = TempDir::new().unwrap();
        let mut store = YamlMetaStore::new(temp.path(), "post");
        store.set("42", "price", json!(19.5)).unwrap();
        store.set("42", "tags", json!(["a", "b"])).unwrap();

        assert!(temp.path().join("post/42.yaml").exists());
        let reopened = YamlMetaStore::new(temp.path(), "post");
        assert_eq!(reopened.get("42", "price").unwrap(), Some(json!(19.5)));
        assert_eq!(reopened.get("42", "tags").unwrap(), Some(json!(["a", "b"])));
        assert_eq!(reopened.keys("42").unwrap(), vec!["price", "tags"]);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = YamlMetaStore::new(temp.path(), "term");
        assert_eq!(store.get("7", "color").unwrap(), None);
        assert!(store.keys("7").unwrap().is_empty());
    }

    #[test]
    fn ids_with_path_syntax_are_rejected() {
        let temp = TempDir::new().unwrap();
        let mut store = YamlMetaStore::new(temp.path(), "post");
        for id in ["../escape", "a/b", "", ".hidden"] {
            let err = store.set(id, "k", json!(1)).unwrap_err();
            assert!(matches!(err, StoreError::InvalidId(_)), "id {id:?}");
        }
    }

    #[test]
    fn options_persist_and_leave_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let mut store = YamlOptionStore::new(temp.path());
        store.set("shop_currency", json!("EUR")).unwrap();
        store.set("shop_open", json!(false)).unwrap();
        assert!(store.delete("shop_open").unwrap());

        let reopened = YamlOptionStore::new(temp.path());
        assert_eq!(reopened.get("shop_currency").unwrap(), Some(json!("EUR")));
        assert_eq!(reopened.keys().unwrap(), vec!["shop_currency"]);

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("options.yaml"), "- just\n- a list\n").unwrap();
        let store = YamlOptionStore::new(temp.path());
        assert!(matches!(
            store.get("x").unwrap_err(),
            StoreError::Corrupt { .. }
        ));
    }
}
