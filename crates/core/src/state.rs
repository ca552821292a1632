use std::mem;

use crate::types::{Coin, LatLng};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    coins: Vec<Coin>,
}

impl Inventory {
    pub fn from_coins(coins: Vec<Coin>) -> Self {
        Self { coins }
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

    pub fn contains(&self, coin: Coin) -> bool {
        self.coins.contains(&coin)
    }

    pub fn last(&self) -> Option<Coin> {
        self.coins.last().copied()
    }

    pub(crate) fn push(&mut self, coin: Coin) {
        self.coins.push(coin);
    }

    /// Removes the most recently collected copy of `coin`.
    pub(crate) fn take(&mut self, coin: Coin) -> Option<Coin> {
        let index = self.coins.iter().rposition(|held| *held == coin)?;
        Some(self.coins.remove(index))
    }

    pub(crate) fn drain(&mut self) -> Vec<Coin> {
        mem::take(&mut self.coins)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub location: LatLng,
    /// Cached inventory size; always rewritten from the inventory, never trusted alone.
    pub points: u32,
    pub inventory: Inventory,
    pub history: Vec<LatLng>,
}

impl Player {
    pub fn at(start: LatLng) -> Self {
        Self { location: start, points: 0, inventory: Inventory::default(), history: vec![start] }
    }

    /// Rewrites the point total from the inventory. Returns the stale value when they disagreed.
    pub(crate) fn sync_points(&mut self) -> Option<u32> {
        let actual = self.inventory.len() as u32;
        if self.points == actual {
            return None;
        }
        let stale = self.points;
        self.points = actual;
        Some(stale)
    }
}
