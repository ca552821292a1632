//! Deterministic string-keyed luck draws.
//!
//! Every random decision in the world (does a cache spawn here, how many coins does it
//! hold) is a pure function of the world seed and a string key, so the same world
//! regenerates identically on every device and in every session.

use std::collections::HashMap;

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::types::Cell;

const UNIT: f64 = 1.0 / (1_u64 << 53) as f64;

/// Source of draws in `[0, 1)` keyed by string.
pub trait LuckSource {
    fn luck(&self, key: &str) -> f64;
}

/// Production source: seeded xxh3 over the key bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashLuck {
    pub seed: u64,
}

impl LuckSource for HashLuck {
    fn luck(&self, key: &str) -> f64 {
        luck(self.seed, key)
    }
}

/// Scripted draws for exercising exact spawn and mint outcomes.
#[derive(Clone, Debug, Default)]
pub struct FixedLuck {
    draws: HashMap<String, f64>,
    fallback: f64,
}

impl FixedLuck {
    /// Every unscripted key draws `fallback`.
    pub fn new(fallback: f64) -> Self {
        Self { draws: HashMap::new(), fallback }
    }

    pub fn with(mut self, key: impl Into<String>, draw: f64) -> Self {
        self.draws.insert(key.into(), draw);
        self
    }
}

impl LuckSource for FixedLuck {
    fn luck(&self, key: &str) -> f64 {
        self.draws.get(key).copied().unwrap_or(self.fallback)
    }
}

pub fn luck(seed: u64, key: &str) -> f64 {
    let hashed = xxh3_64_with_seed(key.as_bytes(), seed);
    (hashed >> 11) as f64 * UNIT
}

pub fn spawn_key(cell: Cell) -> String {
    cell.key()
}

pub fn coin_count_key(cell: Cell) -> String {
    format!("{cell}_coins")
}
