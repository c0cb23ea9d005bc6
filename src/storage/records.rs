//! Flat-file record store
//!
//! Each named collection persists as a single JSON object file mapping the
//! record key to the record. Loading is all-or-nothing per collection: a
//! missing or corrupt file loads as an empty collection (logged, not
//! surfaced). Saving is a blocking whole-collection overwrite; a failed
//! save is reported but in-memory state is never rolled back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::DomainError;

#[derive(Clone, Debug)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Load a whole collection. Missing file and corrupt content both
    /// yield an empty collection; corruption is only logged.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> BTreeMap<String, T> {
        let path = self.file_path(name);

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Store '{}' not present yet, starting empty", name);
                return BTreeMap::new();
            }
            Err(e) => {
                tracing::warn!("Could not read store '{}': {}", name, e);
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Store '{}' is corrupt, loading as empty: {}", name, e);
                BTreeMap::new()
            }
        }
    }

    /// Overwrite a whole collection on disk.
    pub fn save<T: Serialize>(
        &self,
        name: &str,
        records: &BTreeMap<String, T>,
    ) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| DomainError::Persistence(format!("creating {:?}: {}", self.dir, e)))?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| DomainError::Persistence(format!("serializing '{}': {}", name, e)))?;

        let path = self.file_path(name);
        fs::write(&path, json)
            .map_err(|e| DomainError::Persistence(format!("writing {:?}: {}", path, e)))?;

        tracing::debug!("Saved {} records to store '{}'", records.len(), name);
        Ok(())
    }
}
