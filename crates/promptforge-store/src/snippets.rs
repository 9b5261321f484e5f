//! Snippet persistence.
//!
//! On-disk format, one object keyed by upper-cased section tag:
//!
//! ```json
//! {
//!   "ROLE": [
//!     { "name": "reviewer", "content": "You are a careful reviewer." }
//!   ]
//! }
//! ```
//!
//! The file is read and rewritten in full on every save. There is no
//! locking, so two processes saving at once may lose one of the writes.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::StoreConfig;

/// A named, reusable text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub content: String,
}

type SnippetMap = BTreeMap<String, Vec<Snippet>>;

/// Errors from reading or writing the snippet file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read snippet file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write snippet file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("snippet file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize snippets: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Handle on the snippet file.
#[derive(Debug, Clone)]
pub struct SnippetStore {
    path: PathBuf,
}

impl SnippetStore {
    /// Open the store, creating parent directories and an empty `{}` file
    /// when none exists yet.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self {
            path: config.path.clone(),
        };
        if !store.path.exists() {
            if let Some(dir) = store.path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            store.write_all(&SnippetMap::new())?;
            debug!(path = %store.path.display(), "created empty snippet file");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // -- Infallible surface --

    /// Snippets saved under `tag` (case-insensitive), in save order.
    ///
    /// Returns an empty list when the tag is unknown or the file cannot be
    /// read.
    pub fn load(&self, tag: &str) -> Vec<Snippet> {
        self.try_load(tag).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load snippets");
            Vec::new()
        })
    }

    /// Append a snippet under `tag`. Returns `false` on any I/O or parse
    /// error instead of propagating it.
    pub fn save(&self, tag: &str, name: &str, content: &str) -> bool {
        match self.try_save(tag, name, content) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to save snippet");
                false
            }
        }
    }

    /// First snippet under `tag` whose name matches exactly.
    pub fn find(&self, tag: &str, name: &str) -> Option<Snippet> {
        self.load(tag).into_iter().find(|s| s.name == name)
    }

    // -- Fallible surface --

    pub fn try_load(&self, tag: &str) -> Result<Vec<Snippet>, StoreError> {
        let mut all = self.read_all()?;
        Ok(all.remove(&tag.to_uppercase()).unwrap_or_default())
    }

    pub fn try_save(&self, tag: &str, name: &str, content: &str) -> Result<(), StoreError> {
        let mut all = self.read_all()?;
        let key = tag.to_uppercase();
        all.entry(key.clone()).or_default().push(Snippet {
            name: name.to_string(),
            content: content.to_string(),
        });
        self.write_all(&all)?;
        debug!(tag = %key, name, "snippet saved");
        Ok(())
    }

    /// Every tag that has at least one snippet, sorted.
    pub fn try_tags(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(tag, _)| tag)
            .collect())
    }

    // -- File access --

    /// Read the whole file. A missing file reads as empty so a store whose
    /// file was deleted underneath it recreates it on the next save.
    fn read_all(&self) -> Result<SnippetMap, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SnippetMap::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, all: &SnippetMap) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(all).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SnippetStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::new(dir.path().join("snippets.json"));
        let store = SnippetStore::open(&config).unwrap();
        (dir, store)
    }

    #[test]
    fn open_creates_empty_object() {
        let (_dir, store) = temp_store();
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.trim(), "{}");
    }

    #[test]
    fn open_creates_missing_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("snippets.json");
        let store = SnippetStore::open(&StoreConfig::new(&path)).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn open_keeps_existing_content() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snippets.json");
        std::fs::write(&path, r#"{"ROLE":[{"name":"a","content":"b"}]}"#).unwrap();

        let store = SnippetStore::open(&StoreConfig::new(&path)).unwrap();
        assert_eq!(store.load("role").len(), 1);
    }

    #[test]
    fn unknown_tag_loads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load("TASK").is_empty());
    }

    #[test]
    fn missing_file_is_recreated_on_save() {
        let (_dir, store) = temp_store();
        std::fs::remove_file(store.path()).unwrap();
        assert!(store.load("ROLE").is_empty());
        assert!(store.save("ROLE", "a", "b"));
        assert_eq!(store.load("ROLE").len(), 1);
    }

    #[test]
    fn tags_skip_empty_lists() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), r#"{"ROLE":[],"TASK":[{"name":"x","content":"y"}]}"#).unwrap();
        assert_eq!(store.try_tags().unwrap(), ["TASK"]);
    }
}
