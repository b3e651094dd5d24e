use async_trait::async_trait;
use chrono::Utc;
use futures::stream::TryStreamExt;
use mongodb::bson::{Bson, Document, doc, to_bson, to_document};
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument, UpdateOptions,
};
use mongodb::{Client, Collection, Database};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{Changes, CounterStore, RecordStore, Result, StoreError};
use crate::config::DatabaseConfig;
use crate::query::{Condition, Filter, PageWindow};
use crate::records::{Record, fields};

const SEQUENCE_FIELD: &str = "seq";

/// Database handle built on first use.
///
/// Building the client can fail before any server is contacted: a
/// `mongodb+srv://` URI needs a DNS lookup. Failures are not remembered, so
/// every later call tries again until one succeeds, and until then callers
/// get [`StoreError::Unavailable`].
pub struct MongoConnection {
    config: DatabaseConfig,
    database: OnceCell<Database>,
}

impl MongoConnection {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            database: OnceCell::new(),
        }
    }

    pub async fn database(&self) -> Result<&Database> {
        self.database
            .get_or_try_init(|| async {
                let client = Client::with_uri_str(&self.config.uri)
                    .await
                    .map_err(|err| StoreError::Unavailable(err.to_string()))?;
                info!(database = %self.config.name, "MongoDB client created");
                Ok(client.database(&self.config.name))
            })
            .await
    }

    pub async fn collection<T>(&self, name: &str) -> Result<Collection<T>> {
        Ok(self.database().await?.collection::<T>(name))
    }

    /// Round trip to the server
    pub async fn ping(&self) -> Result<()> {
        self.database()
            .await?
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

/// Translate a filter into a MongoDB query document.
///
/// Name needles are escaped so they match as literal substrings.
pub fn filter_document(filter: &Filter) -> Result<Document> {
    let mut document = Document::new();

    for (field, condition) in filter.clauses() {
        let value = match condition {
            Condition::Equals(value) => to_bson(value)?,
            Condition::ContainsIgnoreCase(needle) => Bson::Document(doc! {
                "$regex": regex::escape(needle),
                "$options": "i",
            }),
            Condition::Between { min, max } => {
                let mut range = Document::new();
                if let Some(min) = min {
                    range.insert("$gte", *min);
                }
                if let Some(max) = max {
                    range.insert("$lte", *max);
                }
                Bson::Document(range)
            }
        };
        document.insert(*field, value);
    }

    Ok(document)
}

/// A MongoDB collection of records
#[derive(Clone)]
pub struct MongoStore<T: Record> {
    connection: Arc<MongoConnection>,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> MongoStore<T> {
    pub fn new(connection: Arc<MongoConnection>, collection: &str) -> Self {
        Self {
            connection,
            name: collection.to_string(),
            _record: PhantomData,
        }
    }

    async fn collection(&self) -> Result<Collection<T>> {
        self.connection.collection::<T>(&self.name).await
    }
}

fn by_id(id: &str) -> Document {
    let mut document = Document::new();
    document.insert(fields::ID, id);
    document
}

#[async_trait]
impl<T: Record> RecordStore<T> for MongoStore<T> {
    async fn insert_many(&self, records: Vec<T>) -> Result<Vec<T>> {
        let result = self.collection().await?.insert_many(&records, None).await?;
        debug!(
            collection = %self.name,
            inserted = result.inserted_ids.len(),
            "Inserted records"
        );
        Ok(records)
    }

    async fn find(&self, filter: &Filter, window: PageWindow) -> Result<Vec<T>> {
        let options = FindOptions::builder()
            .skip(window.offset)
            .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .collection()
            .await?
            .find(filter_document(filter)?, options)
            .await?;
        Ok(cursor.try_collect::<Vec<T>>().await?)
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        Ok(self
            .collection()
            .await?
            .count_documents(filter_document(filter)?, None)
            .await?)
    }

    async fn find_top(&self, field: &'static str) -> Result<Option<T>> {
        let mut sort = Document::new();
        sort.insert(field, -1);
        let options = FindOneOptions::builder().sort(sort).build();
        Ok(self
            .collection()
            .await?
            .find_one(Document::new(), options)
            .await?)
    }

    async fn update_by_id(&self, id: &str, changes: Changes) -> Result<Option<T>> {
        let mut set = to_document(&changes)?;
        set.insert(fields::UPDATED_AT, to_bson(&Utc::now())?);

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection()
            .await?
            .find_one_and_update(by_id(id), doc! { "$set": set }, options)
            .await?)
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<T>> {
        Ok(self
            .collection()
            .await?
            .find_one_and_delete(by_id(id), None)
            .await?)
    }
}

/// Sequence documents of the form `{ _id: <name>, seq: <i64> }`
#[derive(Clone)]
pub struct MongoCounters {
    connection: Arc<MongoConnection>,
    name: String,
}

impl MongoCounters {
    pub fn new(connection: Arc<MongoConnection>, collection: &str) -> Self {
        Self {
            connection,
            name: collection.to_string(),
        }
    }

    async fn collection(&self) -> Result<Collection<Document>> {
        self.connection.collection::<Document>(&self.name).await
    }
}

#[async_trait]
impl CounterStore for MongoCounters {
    async fn seed(&self, name: &str, value: i64) -> Result<()> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection()
            .await?
            .update_one(
                by_id(name),
                doc! { "$setOnInsert": { "seq": value } },
                options,
            )
            .await?;
        Ok(())
    }

    async fn increment(&self, name: &str) -> Result<i64> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .collection()
            .await?
            .find_one_and_update(by_id(name), doc! { "$inc": { "seq": 1_i64 } }, options)
            .await?
            .ok_or_else(|| StoreError::Corrupt {
                collection: self.name.clone(),
                reason: format!("upsert of counter '{name}' returned nothing"),
            })?;

        match counter.get(SEQUENCE_FIELD) {
            Some(Bson::Int64(n)) => Ok(*n),
            Some(Bson::Int32(n)) => Ok(i64::from(*n)),
            other => Err(StoreError::Corrupt {
                collection: self.name.clone(),
                reason: format!("counter '{name}' has non-integer {SEQUENCE_FIELD}: {other:?}"),
            }),
        }
    }
}
