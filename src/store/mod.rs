//! Document store abstraction for both rosters
//!
//! Handlers only talk to [`RecordStore`] and [`CounterStore`]; two engines
//! implement them:
//!
//! - [`MongoStore`] / [`MongoCounters`] - MongoDB collections via the official driver,
//!   sharing one lazily built [`MongoConnection`]
//! - [`MemoryStore`] / [`MemoryCounters`] - in-process vectors, for tests and local runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rosterbox::store::{MemoryStore, RecordStore};
//!
//! let store = MemoryStore::<RosterMember>::new();
//! store.insert_many(members).await?;
//! let page = store.find(&filter, window).await?;
//! ```

mod error;
mod memory;
mod mongo;

pub use error::{Result, StoreError};
pub use memory::{MemoryCounters, MemoryStore};
pub use mongo::{MongoConnection, MongoCounters, MongoStore, filter_document};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::query::{Filter, PageWindow};
use crate::records::Record;

/// Field assignments for a partial update, keyed by stored field name
pub type Changes = Map<String, Value>;

/// One collection of records
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Insert all records in one call and return them as stored
    async fn insert_many(&self, records: Vec<T>) -> Result<Vec<T>>;

    /// Matching records in natural order, restricted to the window
    async fn find(&self, filter: &Filter, window: PageWindow) -> Result<Vec<T>>;

    async fn count(&self, filter: &Filter) -> Result<u64>;

    /// The record with the greatest value of an integer field
    async fn find_top(&self, field: &'static str) -> Result<Option<T>>;

    /// Apply `changes`, refresh `updatedAt`, and return the updated record
    async fn update_by_id(&self, id: &str, changes: Changes) -> Result<Option<T>>;

    /// Remove a record and return its last state
    async fn delete_by_id(&self, id: &str) -> Result<Option<T>>;
}

/// Named integer sequences with atomic increments
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Create the sequence at `value` unless it already exists
    async fn seed(&self, name: &str, value: i64) -> Result<()>;

    /// Atomically add one and return the new value
    async fn increment(&self, name: &str) -> Result<i64>;
}
