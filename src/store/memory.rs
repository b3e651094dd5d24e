use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{Changes, CounterStore, RecordStore, Result};
use crate::query::{Filter, PageWindow};
use crate::records::{Record, fields};

/// In-process collection. Records keep insertion order, like an unsorted `find`.
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every stored record
    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    fn matching<'a>(records: &'a [T], filter: &'a Filter) -> impl Iterator<Item = Result<&'a T>> {
        records.iter().filter_map(move |record| {
            match serde_json::to_value(record) {
                Ok(value) if filter.matches(&value) => Some(Ok(record)),
                Ok(_) => None,
                Err(err) => Some(Err(err.into())),
            }
        })
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn insert_many(&self, records: Vec<T>) -> Result<Vec<T>> {
        let mut stored = self.records.write().await;
        stored.extend(records.iter().cloned());
        debug!(inserted = records.len(), total = stored.len(), "Inserted records");
        Ok(records)
    }

    async fn find(&self, filter: &Filter, window: PageWindow) -> Result<Vec<T>> {
        let records = self.records.read().await;
        Self::matching(&records, filter)
            .skip(to_usize(window.offset))
            .take(to_usize(window.limit))
            .map(|record| record.cloned())
            .collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let records = self.records.read().await;
        let mut count = 0;
        for record in Self::matching(&records, filter) {
            record?;
            count += 1;
        }
        Ok(count)
    }

    async fn find_top(&self, field: &'static str) -> Result<Option<T>> {
        let records = self.records.read().await;
        let mut top: Option<(i64, &T)> = None;

        for record in records.iter() {
            let value = serde_json::to_value(record)?;
            let Some(n) = value.get(field).and_then(Value::as_i64) else {
                continue;
            };
            if top.is_none_or(|(best, _)| n > best) {
                top = Some((n, record));
            }
        }

        Ok(top.map(|(_, record)| record.clone()))
    }

    async fn update_by_id(&self, id: &str, changes: Changes) -> Result<Option<T>> {
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|record| record.id() == id) else {
            return Ok(None);
        };

        let mut value = serde_json::to_value(&*slot)?;
        if let Some(object) = value.as_object_mut() {
            object.extend(changes);
            object.insert(fields::UPDATED_AT.to_string(), serde_json::to_value(Utc::now())?);
        }

        let updated: T = serde_json::from_value(value)?;
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<T>> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|record| record.id() == id);
        Ok(index.map(|index| records.remove(index)))
    }
}

/// In-process named sequences
#[derive(Debug, Default)]
pub struct MemoryCounters {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounters {
    async fn seed(&self, name: &str, value: i64) -> Result<()> {
        self.counters
            .lock()
            .await
            .entry(name.to_string())
            .or_insert(value);
        Ok(())
    }

    async fn increment(&self, name: &str) -> Result<i64> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(name.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}
