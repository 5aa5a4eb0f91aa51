use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use snafu::ResultExt as _;

use super::{CorruptFileSnafu, ReadFileSnafu, Result, Store, WriteFileSnafu};

/// File-backed store: one JSON object per backing file mapping keys to raw
/// record strings, loaded once on open and rewritten on every put.
///
/// This mirrors the shape of the browser-local storage the records came
/// from, so the key layout stays identical across backends.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; a file
    /// that exists but does not parse is an error, not a silent wipe.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                serde_json::from_str(&raw).context(CorruptFileSnafu { path: path.clone() })?
            }
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err).context(ReadFileSnafu { path }),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context(WriteFileSnafu {
                path: self.path.clone(),
            })?;
        }

        let raw = serde_json::to_string_pretty(&self.entries)
            .expect("a map of strings always serializes");

        std::fs::write(&self.path, raw).context(WriteFileSnafu {
            path: self.path.clone(),
        })
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_owned(), value);
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut store = FileStore::open(&path).unwrap();
        store.put("video_notes_a", "\"keep clear of the bow\"".to_string()).unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(
            store.get("video_notes_a").unwrap().as_deref(),
            Some("\"keep clear of the bow\"")
        );
        assert_eq!(store.get("video_notes_b").unwrap(), None);
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("records.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn corrupt_backing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "][").unwrap();

        let result = FileStore::open(&path);
        assert!(
            matches!(result, Err(StoreError::CorruptFile { .. })),
            "opening must not overwrite a file it cannot parse"
        );
    }
}
