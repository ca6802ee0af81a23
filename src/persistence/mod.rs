//! Key/value persistence
//!
//! The game only ever stores a handful of small strings (high score,
//! settings JSON, last user). On the web they go to LocalStorage; tests and
//! native builds use the in-memory store.

mod memory;
#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage failures. Callers log these and keep going with in-memory values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No backing store (private browsing, no window)
    Unavailable,
    /// The store rejected the write (usually quota)
    WriteFailed(String),
    /// Value could not be encoded
    Encode(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::WriteFailed(msg) => write!(f, "storage write failed: {}", msg),
            StorageError::Encode(msg) => write!(f, "could not encode value: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value. Missing or malformed entries read as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed {}: {}", key, e);
            None
        }
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        a: u32,
        b: String,
    }

    #[test]
    fn test_json_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let value = Sample {
            a: 3,
            b: "x".into(),
        };
        save_json(&mut store, "k", &value).unwrap();
        assert_eq!(load_json::<Sample>(&store, "k"), Some(value));
    }

    #[test]
    fn test_malformed_json_reads_as_none() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        assert_eq!(load_json::<Sample>(&store, "k"), None);
        assert_eq!(load_json::<Sample>(&store, "missing"), None);
    }
}
