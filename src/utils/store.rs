// src/utils/store.rs
//
// Collection store abstraction. Every mutating call in the services reads
// the full collection, computes the new record set and writes it back as
// one unit, so there is never a partially applied update visible between
// reads. Concurrent writers race at whole-collection granularity
// (last-write-wins); acceptable for low-frequency administrative traffic,
// a versioned backend can be slotted in behind this trait later.
use crate::models::{Delegation, ServiceError, Team, User};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// Records addressable by a stable string id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Team {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Delegation {
    fn key(&self) -> &str {
        &self.id
    }
}

pub trait Collection<T: Keyed + Clone>: Send + Sync {
    fn list(&self) -> Result<Vec<T>, ServiceError>;

    // Replaces the whole collection in one write.
    fn replace_all(&self, records: Vec<T>) -> Result<(), ServiceError>;

    fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        Ok(self.list()?.into_iter().find(|r| r.key() == id))
    }

    // Insert or overwrite by key.
    fn put(&self, record: T) -> Result<T, ServiceError> {
        let mut records = self.list()?;
        match records.iter().position(|r| r.key() == record.key()) {
            Some(idx) => records[idx] = record.clone(),
            None => records.push(record.clone()),
        }
        self.replace_all(records)?;
        Ok(record)
    }
}

// JSON-file backend: one file per collection under the storage directory.
pub struct JsonCollection<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonCollection<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T> for JsonCollection<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    fn list(&self) -> Result<Vec<T>, ServiceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            error!("Failed to read collection {}: {:?}", self.path.display(), e);
            ServiceError::InternalServerError
        })?;

        serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse collection {}: {:?}", self.path.display(), e);
            ServiceError::InternalServerError
        })
    }

    fn replace_all(&self, records: Vec<T>) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create storage directory: {:?}", e);
                    ServiceError::InternalServerError
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&records).map_err(|e| {
            error!("Failed to serialize collection {}: {:?}", self.path.display(), e);
            ServiceError::InternalServerError
        })?;

        fs::write(&self.path, json).map_err(|e| {
            error!("Failed to write collection {}: {:?}", self.path.display(), e);
            ServiceError::InternalServerError
        })
    }
}

// In-memory backend, used by the test suite.
pub struct MemoryCollection<T> {
    records: Mutex<Vec<T>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collection<T> for MemoryCollection<T>
where
    T: Keyed + Clone + Send + Sync,
{
    fn list(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self
            .records
            .lock()
            .map_err(|_| ServiceError::InternalServerError)?
            .clone())
    }

    fn replace_all(&self, records: Vec<T>) -> Result<(), ServiceError> {
        *self
            .records
            .lock()
            .map_err(|_| ServiceError::InternalServerError)? = records;
        Ok(())
    }
}

pub fn storage_dir() -> PathBuf {
    std::env::var("STORAGE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new("./storage").to_path_buf())
}
