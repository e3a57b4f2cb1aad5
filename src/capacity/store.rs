//! Document store seam.
//!
//! Records are whole documents addressed by key: the roster lives under
//! [`ROSTER_KEY`] and every sprint under its own id. There are no field-level
//! updates, every mutation rewrites the full record, and no operation spans
//! more than one record atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::StoreError;

pub const ROSTER_KEY: &str = "members";
pub const SPRINT_KEY_PREFIX: &str = "sprint-";

const RECORD_EXTENSION: &str = "yaml";

pub trait DocumentStore {
    fn read_record(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    fn write_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Keys starting with `prefix`, in ascending order.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

pub fn load<T: DeserializeOwned>(store: &dyn DocumentStore, key: &str) -> Result<T, StoreError> {
    let bytes = store.read_record(key)?;
    serde_yaml::from_slice(&bytes).map_err(|e| StoreError::Codec {
        key: key.to_string(),
        message: e.to_string(),
    })
}

pub fn save<T: Serialize>(store: &mut dyn DocumentStore, key: &str, value: &T) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(value).map_err(|e| StoreError::Codec {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.write_record(key, yaml.as_bytes())
}

/// One YAML file per record inside a data directory. Writes land in a
/// temporary file in the same directory and are renamed over the record.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "invalid record key"),
            });
        }
        Ok(self.root.join(format!("{key}.{RECORD_EXTENSION}")))
    }
}

impl DocumentStore for FileStore {
    fn read_record(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { key: key.to_string() },
            _ => StoreError::Io { key: key.to_string(), source },
        })
    }

    fn write_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source| StoreError::Io { key: key.to_string(), source };
        fs::create_dir_all(&self.root).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        tmp.write_all(bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let io_err = |source| StoreError::Io { key: prefix.to_string(), source };
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_err)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if stem.starts_with(prefix) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&mut self, fail_writes: bool) {
        self.fail_writes = fail_writes;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn read_record(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { key: key.to_string() })
    }

    fn write_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Io {
                key: key.to_string(),
                source: io::Error::other("write rejected"),
            });
        }
        self.records.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
