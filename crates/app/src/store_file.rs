//! File-backed key-value store for saved games.
//!
//! All keys live in one JSON file. Each entry carries the SHA-256 of its value, and an
//! entry whose checksum no longer matches reads as absent. Every `set` and `delete`
//! rewrites the whole file through a temp file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use geocoin_core::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::APP_NAME;

const FILE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct SaveFile {
    format_version: u32,
    entries: BTreeMap<String, StoredEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct StoredEntry {
    value: String,
    sha256_hex: String,
}

impl StoredEntry {
    fn new(value: String) -> Self {
        let sha256_hex = checksum(&value);
        Self { value, sha256_hex }
    }

    fn is_intact(&self) -> bool {
        checksum(&self.value) == self.sha256_hex
    }
}

fn checksum(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:064x}", hasher.finalize())
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: SaveFile,
}

impl FileStore {
    pub fn get_default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| {
            let mut path = proj_dirs.data_dir().to_path_buf();
            path.push("save.json");
            path
        })
    }

    /// Opens the store at `path`. A missing file is an empty store; so is a file that is not
    /// a readable save, which is logged and replaced on the next write.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<SaveFile>(&content) {
                Ok(file) if file.format_version == FILE_FORMAT_VERSION => file,
                Ok(file) => {
                    log::warn!(
                        "ignoring save file {} with format version {}",
                        path.display(),
                        file.format_version
                    );
                    SaveFile::empty()
                }
                Err(e) => {
                    log::warn!("ignoring unreadable save file {}: {e}", path.display());
                    SaveFile::empty()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => SaveFile::empty(),
            Err(e) => return Err(e),
        };
        Ok(Self { path: path.to_path_buf(), file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    fn write_atomic(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.file).map_err(io::Error::other)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SaveFile {
    fn empty() -> Self {
        Self { format_version: FILE_FORMAT_VERSION, entries: BTreeMap::new() }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entry = self.file.entries.get(key)?;
        if !entry.is_intact() {
            log::warn!("checksum mismatch for saved {key}; treating it as absent");
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.file.entries.insert(key.to_string(), StoredEntry::new(value));
        self.write_atomic()?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        if self.file.entries.remove(key).is_some() {
            self.write_atomic()?;
        }
        Ok(())
    }
}
