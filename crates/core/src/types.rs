use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Canonical handle for a cell interned by a [`crate::Board`].
    pub struct CellId;
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

pub const MAX_LAT: f64 = 90.0;
pub const MAX_LNG: f64 = 180.0;

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and within `±90` / `±180` degrees.
    pub fn is_on_globe(&self) -> bool {
        self.lat.abs() <= MAX_LAT && self.lng.abs() <= MAX_LNG
    }

    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self { lat: self.lat + dlat, lng: self.lng + dlng }
    }
}

/// Grid square `(i, j)`; orders row-major by `i` then `j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub i: i32,
    pub j: i32,
}

impl Cell {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// String key `"i,j"` used for luck draws and persisted cache data.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellKeyError {
    pub raw: String,
}

impl fmt::Display for CellKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell key '{}' is not of the form 'i,j'", self.raw)
    }
}

impl FromStr for Cell {
    type Err = CellKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || CellKeyError { raw: raw.to_string() };
        let (i, j) = raw.split_once(',').ok_or_else(err)?;
        let i = i.trim().parse::<i32>().map_err(|_| err())?;
        let j = j.trim().parse::<i32>().map_err(|_| err())?;
        Ok(Self { i, j })
    }
}

/// A coin is named by the cell that minted it and its serial within that batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub i: i32,
    pub j: i32,
    pub serial: u32,
}

impl Coin {
    pub const fn new(origin: Cell, serial: u32) -> Self {
        Self { i: origin.i, j: origin.j, serial }
    }

    pub const fn origin(&self) -> Cell {
        Cell { i: self.i, j: self.j }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.i, self.j, self.serial)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    pub lat_min: f64,
    pub lng_min: f64,
    pub lat_max: f64,
    pub lng_max: f64,
}

impl CellBounds {
    /// Half-open containment, matching the floor division used for cell lookup.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.lat_min
            && point.lat < self.lat_max
            && point.lng >= self.lng_min
            && point.lng < self.lng_max
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Tile offset `(di, dj)` for one step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoinLocation {
    InCache(Cell),
    InInventory,
}

/// Result of a collect or deposit. A skipped transfer leaves every list untouched.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    Moved(Coin),
    Skipped(SkipReason),
}

impl Transfer {
    pub fn coin(self) -> Option<Coin> {
        match self {
            Self::Moved(coin) => Some(coin),
            Self::Skipped(_) => None,
        }
    }

    pub fn is_moved(self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    EmptyCache,
    EmptyInventory,
    NoCache,
    OutOfReach,
    NotInInventory,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptyCache => "the cache is empty",
            Self::EmptyInventory => "the inventory is empty",
            Self::NoCache => "there is no cache in that cell",
            Self::OutOfReach => "that cell is out of reach",
            Self::NotInInventory => "that coin is not in the inventory",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    CacheMinted { cell: Cell, coins: u32 },
    Moved { from: Cell, to: Cell },
    CoinCollected { coin: Coin, from: Cell },
    CoinDeposited { coin: Coin, into: Cell },
    WorldReset { coins_returned: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    ResetNotConfirmed,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResetNotConfirmed => write!(f, "reset was not confirmed"),
        }
    }
}

impl Error for GameError {}
