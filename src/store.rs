//! Entity storage behind the CRUD handler.
//!
//! Entities are grouped by type name (`Shoes`, `Books`, ...) and addressed by
//! a string id. The in-memory implementation is shared by every CRUD handler
//! the factory builds, so all access goes through its lock.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no such entity: {entity}/{id}")]
    NotFound { entity: String, id: String },
    #[error("no available ids for entity {0}")]
    IdsExhausted(String),
}

/// Storage operations needed by the CRUD handler.
pub trait EntityStore: Send + Sync {
    fn exists(&self, entity: &str, id: &str) -> bool;

    fn read(&self, entity: &str, id: &str) -> Result<Vec<u8>, StoreError>;

    /// Creates or replaces the entity stored under `id`.
    fn write(&self, entity: &str, id: &str, data: Vec<u8>) -> Result<(), StoreError>;

    /// Stores `data` under a newly allocated id and returns that id.
    fn create(&self, entity: &str, data: Vec<u8>) -> Result<String, StoreError>;

    fn delete(&self, entity: &str, id: &str) -> Result<(), StoreError>;

    /// All ids of an entity type, sorted.
    fn list_ids(&self, entity: &str) -> Vec<String>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for MemoryStore {
    fn exists(&self, entity: &str, id: &str) -> bool {
        self.data
            .read()
            .get(entity)
            .is_some_and(|ids| ids.contains_key(id))
    }

    fn read(&self, entity: &str, id: &str) -> Result<Vec<u8>, StoreError> {
        self.data
            .read()
            .get(entity)
            .and_then(|ids| ids.get(id))
            .cloned()
            .ok_or_else(|| {
                warn!(entity, id, "MemoryStore: no such entity");
                not_found(entity, id)
            })
    }

    fn write(&self, entity: &str, id: &str, data: Vec<u8>) -> Result<(), StoreError> {
        debug!(entity, id, "MemoryStore: writing entity");
        self.data
            .write()
            .entry(entity.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    fn create(&self, entity: &str, data: Vec<u8>) -> Result<String, StoreError> {
        let mut guard = self.data.write();
        let ids = guard.entry(entity.to_string()).or_default();

        let id = next_free_id(ids.keys()).ok_or_else(|| {
            error!(entity, "MemoryStore: id space exhausted");
            StoreError::IdsExhausted(entity.to_string())
        })?;
        let id = id.to_string();

        debug!(entity, id = %id, "MemoryStore: creating entity");
        ids.insert(id.clone(), data);
        Ok(id)
    }

    fn delete(&self, entity: &str, id: &str) -> Result<(), StoreError> {
        let removed = self
            .data
            .write()
            .get_mut(entity)
            .and_then(|ids| ids.remove(id));

        match removed {
            Some(_) => {
                debug!(entity, id, "MemoryStore: removed entity");
                Ok(())
            }
            None => {
                warn!(entity, id, "MemoryStore: could not remove entity");
                Err(not_found(entity, id))
            }
        }
    }

    fn list_ids(&self, entity: &str) -> Vec<String> {
        self.data
            .read()
            .get(entity)
            .map(|ids| ids.keys().cloned().collect())
            .unwrap_or_default()
    }
}

fn not_found(entity: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity: entity.to_string(),
        id: id.to_string(),
    }
}

/// Smallest positive integer not used as an id. Non-numeric ids are ignored.
fn next_free_id<'a>(ids: impl Iterator<Item = &'a String>) -> Option<u64> {
    let used: HashSet<u64> = ids
        .filter_map(|id| id.parse::<u64>().ok())
        .filter(|id| *id > 0)
        .collect();

    (1..=u64::MAX).find(|candidate| !used.contains(candidate))
}
