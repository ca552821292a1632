//! Versioned text encoding for every persisted field.
//!
//! Each field is stored as JSON of the form `{"format_version": 1, "data": ...}`.
//! Cache data is keyed by the `"i,j"` cell string; a single entry with an unreadable key
//! is dropped on decode while the rest of the registry still restores.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::CacheSnapshot;
use crate::types::{Cell, Coin};

pub const FORMAT_VERSION: u16 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    format_version: u16,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct VersionProbe {
    format_version: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Json(String),
    UnsupportedVersion { found: u16 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(message) => write!(f, "malformed field: {message}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found} (expected {FORMAT_VERSION})")
            }
        }
    }
}

impl Error for CodecError {}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(&EnvelopeRef { format_version: FORMAT_VERSION, data: &value })
        .map_err(|e| CodecError::Json(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, CodecError> {
    let probe: VersionProbe =
        serde_json::from_str(raw).map_err(|e| CodecError::Json(e.to_string()))?;
    if probe.format_version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion { found: probe.format_version });
    }
    let envelope: Envelope<T> =
        serde_json::from_str(raw).map_err(|e| CodecError::Json(e.to_string()))?;
    Ok(envelope.data)
}

pub fn encode_caches(snapshot: &CacheSnapshot) -> Result<String, CodecError> {
    let keyed: BTreeMap<String, &Vec<Coin>> =
        snapshot.iter().map(|(cell, coins)| (cell.key(), coins)).collect();
    encode(&keyed)
}

pub fn decode_caches(raw: &str) -> Result<CacheSnapshot, CodecError> {
    let keyed: BTreeMap<String, Vec<Coin>> = decode(raw)?;
    let mut snapshot = CacheSnapshot::new();
    for (key, coins) in keyed {
        match key.parse::<Cell>() {
            Ok(cell) => {
                snapshot.insert(cell, coins);
            }
            Err(err) => log::warn!("dropping cache entry with {} coins: {err}", coins.len()),
        }
    }
    Ok(snapshot)
}
