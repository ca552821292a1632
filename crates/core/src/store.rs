//! Key-value storage seam for saved games.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::io;

use crate::codec::CodecError;

/// The fixed set of keys a saved game occupies.
pub mod keys {
    pub const PLAYER_LOCATION: &str = "player_location";
    pub const POINT_TOTAL: &str = "point_total";
    pub const INVENTORY: &str = "inventory";
    pub const CACHE_DATA: &str = "cache_data";
    pub const MOVEMENT_HISTORY: &str = "movement_history";

    pub const ALL: [&str; 5] =
        [PLAYER_LOCATION, POINT_TOTAL, INVENTORY, CACHE_DATA, MOVEMENT_HISTORY];
}

/// String blobs addressed by key. A value that cannot be read back is reported as absent.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Codec(CodecError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "store I/O error: {e}"),
            Self::Codec(e) => write!(f, "store encoding error: {e}"),
        }
    }
}

impl Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CodecError> for StoreError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

/// Removes every key a saved game occupies.
pub fn clear_saved_game(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
    for key in keys::ALL {
        store.delete(key)?;
    }
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
