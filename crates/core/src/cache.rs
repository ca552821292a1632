//! Cache registry: lazily minted, mint-once coin caches keyed by cell.

use std::collections::{BTreeMap, BTreeSet};

use crate::luck::{LuckSource, coin_count_key, spawn_key};
use crate::types::{Cell, Coin, SkipReason, Transfer};

/// Cache contents by cell, in cell order. Coin lists keep their stack order.
pub type CacheSnapshot = BTreeMap<Cell, Vec<Coin>>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MintRule {
    pub spawn_probability: f64,
    pub min_coins: u32,
    pub max_coins: u32,
}

impl MintRule {
    /// Maps a draw in `[0, 1)` uniformly onto `min_coins..=max_coins`.
    pub fn coin_count(&self, draw: f64) -> u32 {
        let min = u64::from(self.min_coins);
        let span = u64::from(self.max_coins).saturating_sub(min) + 1;
        let offset = ((draw * span as f64).floor() as u64).min(span - 1);
        u32::try_from(min + offset).unwrap_or(u32::MAX)
    }

    /// Number of coins a cache in `cell` is minted with, or `None` when nothing spawns there.
    pub fn survey(&self, cell: Cell, luck: &dyn LuckSource) -> Option<u32> {
        if luck.luck(&spawn_key(cell)) >= self.spawn_probability {
            return None;
        }
        Some(self.coin_count(luck.luck(&coin_count_key(cell))))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cache {
    cell: Cell,
    coins: Vec<Coin>,
}

impl Cache {
    pub fn mint(cell: Cell, count: u32) -> Self {
        Self { cell, coins: (0..count).map(|serial| Coin::new(cell, serial)).collect() }
    }

    pub fn from_coins(cell: Cell, coins: Vec<Coin>) -> Self {
        Self { cell, coins }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Pops the most recently added coin.
    pub fn collect(&mut self) -> Option<Coin> {
        self.coins.pop()
    }

    pub fn deposit(&mut self, coin: Coin) {
        self.coins.push(coin);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheRegistry {
    caches: BTreeMap<Cell, Cache>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cell: Cell) -> Option<&Cache> {
        self.caches.get(&cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.caches.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cache> {
        self.caches.values()
    }

    pub fn total_coins(&self) -> usize {
        self.caches.values().map(Cache::len).sum()
    }

    /// Returns the cache registered for `cell`, minting it on the first visit when the
    /// spawn draw succeeds. A registered cell is never minted again.
    pub fn ensure_cache(
        &mut self,
        cell: Cell,
        rule: &MintRule,
        luck: &dyn LuckSource,
    ) -> Option<&Cache> {
        if !self.caches.contains_key(&cell) {
            let count = rule.survey(cell, luck)?;
            log::debug!("minted cache {cell} with {count} coins");
            self.caches.insert(cell, Cache::mint(cell, count));
        }
        self.caches.get(&cell)
    }

    pub fn collect(&mut self, cell: Cell) -> Transfer {
        let Some(cache) = self.caches.get_mut(&cell) else {
            return Transfer::Skipped(SkipReason::NoCache);
        };
        match cache.collect() {
            Some(coin) => Transfer::Moved(coin),
            None => Transfer::Skipped(SkipReason::EmptyCache),
        }
    }

    /// Hands the coin back when `cell` has no cache so the caller never loses it.
    pub fn deposit(&mut self, cell: Cell, coin: Coin) -> Result<(), Coin> {
        match self.caches.get_mut(&cell) {
            Some(cache) => {
                cache.deposit(coin);
                Ok(())
            }
            None => Err(coin),
        }
    }

    pub fn find(&self, coin: Coin) -> Option<Cell> {
        self.caches.values().find(|cache| cache.coins.contains(&coin)).map(Cache::cell)
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        self.caches.iter().map(|(&cell, cache)| (cell, cache.coins.clone())).collect()
    }

    /// Replaces every cache with the snapshot's lists verbatim. Nothing is minted.
    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        self.caches = snapshot
            .into_iter()
            .map(|(cell, coins)| (cell, Cache::from_coins(cell, coins)))
            .collect();
    }

    /// Sends every coin, cached or `loose`, back to the cache of the cell that minted it,
    /// ordered by serial. Duplicate identities collapse to one coin.
    pub(crate) fn return_coins_to_origin(&mut self, loose: Vec<Coin>) {
        let mut by_origin: BTreeMap<Cell, BTreeSet<u32>> = BTreeMap::new();
        for cache in self.caches.values_mut() {
            for coin in cache.coins.drain(..) {
                by_origin.entry(coin.origin()).or_default().insert(coin.serial);
            }
        }
        for coin in loose {
            by_origin.entry(coin.origin()).or_default().insert(coin.serial);
        }
        for (cell, serials) in by_origin {
            let cache = self.caches.entry(cell).or_insert_with(|| Cache::from_coins(cell, vec![]));
            cache.coins = serials.into_iter().map(|serial| Coin::new(cell, serial)).collect();
        }
    }
}
