//! Sequential identifiers for registrations.
//!
//! [`MaxPlusOne`] derives the next identifier from the stored maximum on every
//! call. It keeps no state of its own, but two concurrent callers can read the
//! same maximum and hand out the same identifier; nothing here detects that.
//!
//! [`CounterAllocator`] closes that gap with an atomically incremented counter
//! document, seeded once from the stored maximum so existing data is respected.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::records::{Registration, fields};
use crate::store::{CounterStore, RecordStore, Result};

/// Identifier handed to the first registration of an empty collection
pub const FIRST_SEQUENTIAL_ID: i64 = 200;

/// Counter document name used by [`CounterAllocator`]
pub const REGISTRATION_SEQUENCE: &str = "registrations";

#[async_trait]
pub trait IdAllocator: Send + Sync {
    async fn next_id(&self) -> Result<i64>;
}

/// Read the highest stored identifier and add one
pub struct MaxPlusOne {
    records: Arc<dyn RecordStore<Registration>>,
    first: i64,
}

impl MaxPlusOne {
    pub fn new(records: Arc<dyn RecordStore<Registration>>, first: i64) -> Self {
        Self { records, first }
    }
}

#[async_trait]
impl IdAllocator for MaxPlusOne {
    async fn next_id(&self) -> Result<i64> {
        let next = match self.records.find_top(fields::SEQUENTIAL_ID).await? {
            Some(last) => last.sequential_id + 1,
            None => self.first,
        };
        debug!(next, "Allocated sequential id from stored maximum");
        Ok(next)
    }
}

/// Atomic counter, seeded from the stored maximum on first use
pub struct CounterAllocator {
    counters: Arc<dyn CounterStore>,
    records: Arc<dyn RecordStore<Registration>>,
    first: i64,
    seeded: OnceCell<()>,
}

impl CounterAllocator {
    pub fn new(
        counters: Arc<dyn CounterStore>,
        records: Arc<dyn RecordStore<Registration>>,
        first: i64,
    ) -> Self {
        Self {
            counters,
            records,
            first,
            seeded: OnceCell::new(),
        }
    }

    async fn seed(&self) -> Result<()> {
        let last = match self.records.find_top(fields::SEQUENTIAL_ID).await? {
            Some(last) => last.sequential_id,
            None => self.first - 1,
        };
        self.counters.seed(REGISTRATION_SEQUENCE, last).await?;
        info!(last, "Registration sequence seeded");
        Ok(())
    }
}

#[async_trait]
impl IdAllocator for CounterAllocator {
    async fn next_id(&self) -> Result<i64> {
        self.seeded.get_or_try_init(|| self.seed()).await?;
        let next = self.counters.increment(REGISTRATION_SEQUENCE).await?;
        debug!(next, "Allocated sequential id from counter");
        Ok(next)
    }
}
