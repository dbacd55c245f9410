use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SweepError};

use super::Store;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go through a temporary file and a rename so readers never see a
/// half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    fn store_err(key: &str) -> impl FnOnce(std::io::Error) -> SweepError + '_ {
        move |source| SweepError::Store {
            key: key.to_string(),
            source,
        }
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::store_err(key)(e)),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn put(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(Self::store_err(key))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(Self::store_err(key))?;
        file.write_all(serde_json::to_string(value)?.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(Self::store_err(key))?;
        fs::rename(&tmp, &path).map_err(Self::store_err(key))?;

        tracing::trace!(key, path = %path.display(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::store_err(key)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.get("threshold_value").unwrap().is_none());
    }

    #[test]
    fn put_then_get_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        JsonFileStore::new(dir.path())
            .put("threshold_unit", &json!("GB"))
            .unwrap();

        let reopened = JsonFileStore::new(dir.path());
        assert_eq!(reopened.get("threshold_unit").unwrap(), Some(json!("GB")));
    }

    #[test]
    fn put_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/state"));
        store.put("k", &json!(1)).unwrap();
        assert!(dir.path().join("nested/state/k.json").exists());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.put("k", &json!({"a": 1})).unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.put("reputation_::1", &json!(true)).unwrap();
        assert!(dir.path().join("reputation___1.json").exists());
        assert_eq!(store.get("reputation_::1").unwrap(), Some(json!(true)));
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(matches!(store.get("bad"), Err(SweepError::Serialization(_))));
    }
}
