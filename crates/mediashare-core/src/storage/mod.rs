//! Storage layer: the entry data model and its persistence backends.

pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use memory::MemoryPersistence;
pub use sqlite::{SqlitePersistence, StoreMetadata};
pub use traits::Persistence;
pub use types::{Entry, EntryState, EntrySummary, Payload};
