//! Persistance de la position de lecture par album
//!
//! All albums share one JSON mapping stored under [`RECORDS_KEY`]:
//!
//! ```json
//! {
//!   "http://pan.example.org/books/three-body": { "index": 3, "time": 42.0 },
//!   "http://pan.example.org/books/sanguo": { "index": 0 }
//! }
//! ```
//!
//! Every write reads the whole mapping, merges the new fields into the album
//! entry and stores the mapping back. Reading never fails: a missing or
//! malformed payload is an empty record. Storage failures are logged and
//! absorbed, playback must keep going without persistence.

mod storage;

pub use storage::{FileStorage, MemoryStorage, RecordStorage};

use crate::options::AlbumIdentity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the shared mapping
pub const RECORDS_KEY: &str = "ysxs-player-records";

/// Playback position of one album
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl PlaybackRecord {
    pub fn with_index(index: u64) -> Self {
        Self {
            index: Some(index),
            time: None,
        }
    }

    pub fn with_time(time: f64) -> Self {
        Self {
            index: None,
            time: Some(time),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_none() && self.time.is_none()
    }

    /// Lenient decoding: a field with an unexpected type is ignored
    fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let index = object.get("index").and_then(|index| {
            index.as_u64().or_else(|| {
                index
                    .as_f64()
                    .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                    .map(|n| n as u64)
            })
        });
        let time = object
            .get("time")
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite());

        Self { index, time }
    }

    /// Overwrites the fields set in `self`, keeps everything else
    fn merge_into(&self, target: &mut Map<String, Value>) {
        if let Some(index) = self.index {
            target.insert("index".to_string(), Value::from(index));
        }
        if let Some(time) = self.time {
            target.insert("time".to_string(), Value::from(time));
        }
    }
}

/// Durable mapping `AlbumIdentity -> PlaybackRecord`
#[derive(Clone)]
pub struct PlaybackStateStore {
    storage: Arc<dyn RecordStorage>,
    key: String,
}

impl PlaybackStateStore {
    pub fn new(storage: Arc<dyn RecordStorage>) -> Self {
        Self::with_key(storage, RECORDS_KEY)
    }

    /// Store using another storage key
    pub fn with_key(storage: Arc<dyn RecordStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Volatile store, mostly for tests and headless runs
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored record of `identity`, empty when unknown or unreadable
    pub fn read(&self, identity: &AlbumIdentity) -> PlaybackRecord {
        self.load()
            .get(identity.as_str())
            .map(PlaybackRecord::from_value)
            .unwrap_or_default()
    }

    /// Merges `partial` into the record of `identity` and persists the mapping
    pub fn write(&self, identity: &AlbumIdentity, partial: PlaybackRecord) {
        if partial.is_empty() {
            return;
        }

        let mut records = self.load();
        let entry = records
            .entry(identity.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(fields) = entry {
            partial.merge_into(fields);
        }

        let payload = match serde_json::to_string(&Value::Object(records)) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode playback records: {}", e);
                return;
            }
        };

        match self.storage.set_item(&self.key, &payload) {
            Ok(()) => debug!("Playback record of {} updated: {:?}", identity, partial),
            Err(e) => warn!("Failed to persist playback records: {:#}", e),
        }
    }

    /// Identities with a stored record
    pub fn albums(&self) -> Vec<String> {
        self.load().keys().cloned().collect()
    }

    /// Handle bound to one album
    pub fn album(&self, identity: AlbumIdentity) -> AlbumRecord {
        AlbumRecord {
            store: self.clone(),
            identity,
        }
    }

    fn load(&self) -> Map<String, Value> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Map::new(),
            Err(e) => {
                warn!("Failed to read playback records: {:#}", e);
                return Map::new();
            }
        };

        if raw.trim().is_empty() {
            return Map::new();
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(records)) => records,
            Ok(_) => {
                warn!("Playback records are not a JSON object, ignoring them");
                Map::new()
            }
            Err(e) => {
                warn!("Malformed playback records, ignoring them: {}", e);
                Map::new()
            }
        }
    }
}

/// Playback record of a single album
#[derive(Clone)]
pub struct AlbumRecord {
    store: PlaybackStateStore,
    identity: AlbumIdentity,
}

impl AlbumRecord {
    pub fn identity(&self) -> &AlbumIdentity {
        &self.identity
    }

    pub fn read(&self) -> PlaybackRecord {
        self.store.read(&self.identity)
    }

    pub fn save_index(&self, index: usize) {
        self.store
            .write(&self.identity, PlaybackRecord::with_index(index as u64));
    }

    /// Stores the position truncated to whole seconds; negative times are ignored
    pub fn save_time(&self, time: f64) {
        if !time.is_finite() || time < 0.0 {
            return;
        }
        self.store
            .write(&self.identity, PlaybackRecord::with_time(time.floor()));
    }

    pub fn query_index(&self) -> Option<usize> {
        self.read()
            .index
            .and_then(|index| usize::try_from(index).ok())
    }

    /// Stored position, `None` when there is nothing to restore
    pub fn query_time(&self) -> Option<f64> {
        self.read().time.filter(|time| *time > 0.0)
    }
}
