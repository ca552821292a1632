//! Stable snapshot hashing for determinism checks.
//! Covers everything that is persisted: location, history, inventory, and every cache
//! in cell order. It does not own persistence itself.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        write_point(&mut hasher, self.player.location);
        hasher.write_u32(self.player.points);
        hasher.write_usize(self.player.history.len());
        for &point in &self.player.history {
            write_point(&mut hasher, point);
        }
        hasher.write_usize(self.player.inventory.len());
        for &coin in self.player.inventory.coins() {
            write_coin(&mut hasher, coin);
        }
        hasher.write_usize(self.caches.len());
        for cache in self.caches.iter() {
            hasher.write_i32(cache.cell().i);
            hasher.write_i32(cache.cell().j);
            hasher.write_usize(cache.len());
            for &coin in cache.coins() {
                write_coin(&mut hasher, coin);
            }
        }
        hasher.finish()
    }
}

fn write_point(hasher: &mut Xxh3, point: LatLng) {
    hasher.write_u64(point.lat.to_bits());
    hasher.write_u64(point.lng.to_bits());
}

fn write_coin(hasher: &mut Xxh3, coin: Coin) {
    hasher.write_i32(coin.i);
    hasher.write_i32(coin.j);
    hasher.write_u32(coin.serial);
}
