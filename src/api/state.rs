use std::sync::Arc;

use tracing::{error, info};

use crate::allocator::{CounterAllocator, IdAllocator, MaxPlusOne};
use crate::config::{AllocatorKind, Config, StoreBackend};
use crate::handlers::{RegistrationHandler, RosterHandler};
use crate::observability::Metrics;
use crate::records::{Registration, RosterMember};
use crate::store::{
    CounterStore, MemoryCounters, MemoryStore, MongoConnection, MongoCounters, MongoStore,
    RecordStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub roster: Arc<RosterHandler>,
    pub registrations: Arc<RegistrationHandler>,
    /// Present when backed by MongoDB; pinged by the health endpoint
    pub database: Option<Arc<MongoConnection>>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        members: Arc<dyn RecordStore<RosterMember>>,
        registrations: Arc<dyn RecordStore<Registration>>,
        counters: Arc<dyn CounterStore>,
        database: Option<Arc<MongoConnection>>,
    ) -> Self {
        let allocator = build_allocator(&config, registrations.clone(), counters);
        let roster = RosterHandler::new(members, config.pagination.clone());
        let registrations =
            RegistrationHandler::new(registrations, allocator, config.pagination.clone());

        Self {
            config: Arc::new(config),
            roster: Arc::new(roster),
            registrations: Arc::new(registrations),
            database,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// State over process-local stores
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(MemoryStore::<RosterMember>::new()),
            Arc::new(MemoryStore::<Registration>::new()),
            Arc::new(MemoryCounters::new()),
            None,
        )
    }

    /// Build state for the configured backend.
    ///
    /// An unreachable MongoDB server is logged but not fatal: requests fail
    /// with storage errors until it comes back.
    pub async fn connect(config: Config) -> Self {
        match config.database.backend {
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Self::in_memory(config)
            }
            StoreBackend::Mongo => {
                let connection = Arc::new(MongoConnection::new(config.database.clone()));
                match connection.ping().await {
                    Ok(()) => info!(database = %config.database.name, "Connected to MongoDB"),
                    Err(err) => error!(error = %err, "MongoDB connection error"),
                }

                let db = &config.database;
                let members = Arc::new(MongoStore::<RosterMember>::new(
                    connection.clone(),
                    &db.members_collection,
                ));
                let registrations = Arc::new(MongoStore::<Registration>::new(
                    connection.clone(),
                    &db.registrations_collection,
                ));
                let counters = Arc::new(MongoCounters::new(
                    connection.clone(),
                    &db.counters_collection,
                ));

                Self::new(config, members, registrations, counters, Some(connection))
            }
        }
    }
}

fn build_allocator(
    config: &Config,
    registrations: Arc<dyn RecordStore<Registration>>,
    counters: Arc<dyn CounterStore>,
) -> Arc<dyn IdAllocator> {
    let first = config.registration.first_sequential_id;
    match config.registration.allocator {
        AllocatorKind::MaxPlusOne => Arc::new(MaxPlusOne::new(registrations, first)),
        AllocatorKind::Counter => Arc::new(CounterAllocator::new(counters, registrations, first)),
    }
}
