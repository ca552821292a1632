//! Saving to and loading from a key-value store.
//!
//! `save` writes the five fields one by one. There is no transaction across them: a
//! failure (or crash) part-way leaves earlier fields new and later fields stale, for
//! example a fresh inventory next to old cache data. `reset` is the recovery path.
//!
//! `load` reads each field independently. A missing or malformed field keeps the value
//! the freshly constructed game already holds and is listed in the returned report.

use crate::codec::{self, CodecError};
use crate::store::{KeyValueStore, StoreError, keys};

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldIssue {
    Missing,
    Malformed(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub restored: Vec<&'static str>,
    pub defaulted: Vec<(&'static str, FieldIssue)>,
    /// Persisted point total that disagreed with the restored inventory.
    pub stale_points: Option<u32>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }

    /// True when nothing at all was restored, as on a first launch.
    pub fn is_fresh(&self) -> bool {
        self.restored.is_empty()
    }
}

impl Game {
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(keys::PLAYER_LOCATION, codec::encode(&self.player.location)?)?;
        store.set(keys::POINT_TOTAL, codec::encode(&self.player.points)?)?;
        store.set(keys::INVENTORY, codec::encode(self.player.inventory.coins())?)?;
        store.set(keys::CACHE_DATA, codec::encode_caches(&self.caches.snapshot())?)?;
        store.set(keys::MOVEMENT_HISTORY, codec::encode(&self.player.history)?)?;
        log::debug!(
            "saved game: {} coins held, {} caches, {} history points",
            self.player.inventory.len(),
            self.caches.len(),
            self.player.history.len()
        );
        Ok(())
    }

    /// Meant to run on a freshly constructed game.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> LoadReport {
        let mut report = LoadReport::default();

        if let Some(location) =
            read_field(store, keys::PLAYER_LOCATION, &mut report, codec::decode::<LatLng>)
        {
            self.player.location = location;
        }
        if let Some(points) = read_field(store, keys::POINT_TOTAL, &mut report, codec::decode::<u32>)
        {
            self.player.points = points;
        }
        if let Some(coins) =
            read_field(store, keys::INVENTORY, &mut report, codec::decode::<Vec<Coin>>)
        {
            self.player.inventory = Inventory::from_coins(coins);
        }
        if let Some(snapshot) = read_field(store, keys::CACHE_DATA, &mut report, codec::decode_caches)
        {
            self.caches.restore(snapshot);
        }
        if let Some(history) =
            read_field(store, keys::MOVEMENT_HISTORY, &mut report, codec::decode::<Vec<LatLng>>)
        {
            self.player.history = history;
        }

        report.stale_points = self.player.sync_points();
        if let Some(stale) = report.stale_points {
            log::warn!(
                "saved point total {stale} disagreed with {} held coins; using the inventory",
                self.player.points
            );
        }
        self.refresh_visible();
        log::info!(
            "loaded game: {} fields restored, {} defaulted",
            report.restored.len(),
            report.defaulted.len()
        );
        report
    }
}

fn read_field<T>(
    store: &dyn KeyValueStore,
    key: &'static str,
    report: &mut LoadReport,
    decode: impl Fn(&str) -> Result<T, CodecError>,
) -> Option<T> {
    let Some(raw) = store.get(key) else {
        report.defaulted.push((key, FieldIssue::Missing));
        return None;
    };
    match decode(&raw) {
        Ok(value) => {
            report.restored.push(key);
            Some(value)
        }
        Err(err) => {
            log::warn!("ignoring saved {key}: {err}");
            report.defaulted.push((key, FieldIssue::Malformed(err.to_string())));
            None
        }
    }
}
