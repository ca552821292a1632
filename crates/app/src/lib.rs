pub mod app_loop;
pub mod route;
pub mod store_file;

use geocoin_core::{Coin, LatLng};

pub const APP_NAME: &str = "Geocoin";

/// The status line shown after every point change.
pub fn format_status(points: u32) -> String {
    format!("Points: {points}")
}

/// Format a snapshot hash as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_snapshot_hash(hash: u64) -> String {
    format!("0x{hash:016x}")
}

pub fn format_location(point: LatLng) -> String {
    format!("({:.6}, {:.6})", point.lat, point.lng)
}

/// Coins in inventory order, comma separated.
pub fn format_coin_list(coins: &[Coin]) -> String {
    coins.iter().map(Coin::to_string).collect::<Vec<_>>().join(", ")
}
