//! Keyed-collection persistence.
//!
//! Every collection is a list of id-keyed records kept in memory and written
//! back to a [`StorageBackend`] as a single JSON blob under the collection
//! name. The store holds control-plane metadata only, so rewriting the whole
//! collection on each write is acceptable.

mod backend;
mod collection;
mod error;
mod record;
mod sqlite;

pub use backend::{MemoryBackend, StorageBackend};
pub use collection::{Batch, Collection, CollectionStore};
pub use error::StoreError;
pub use record::{Record, generate_id};
pub use sqlite::SqliteBackend;
