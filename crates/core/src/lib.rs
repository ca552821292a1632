pub mod board;
pub mod cache;
pub mod codec;
pub mod config;
pub mod game;
pub mod luck;
pub mod state;
pub mod store;
pub mod tracking;
pub mod types;

pub use board::Board;
pub use cache::{Cache, CacheRegistry, CacheSnapshot, MintRule};
pub use codec::CodecError;
pub use config::{ConfigError, WorldConfig};
pub use game::{FieldIssue, Game, LoadReport};
pub use luck::{FixedLuck, HashLuck, LuckSource};
pub use state::{Inventory, Player};
pub use store::{KeyValueStore, MemoryStore, StoreError, keys};
pub use tracking::{LocationSource, TickHandle, Tracker};
pub use types::*;
