use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Upper bound for request bodies, in bytes
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_max_payload_bytes() -> usize {
    1024 * 1024 // 1 MB
}

/// Storage backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    Memory,
}

/// Document database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Connection string (usually supplied through `MONGO_URI`)
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database_name")]
    pub name: String,
    #[serde(default = "default_members_collection")]
    pub members_collection: String,
    #[serde(default = "default_registrations_collection")]
    pub registrations_collection: String,
    #[serde(default = "default_counters_collection")]
    pub counters_collection: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: default_uri(),
            name: default_database_name(),
            members_collection: default_members_collection(),
            registrations_collection: default_registrations_collection(),
            counters_collection: default_counters_collection(),
        }
    }
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database_name() -> String {
    "rosterbox".to_string()
}

fn default_members_collection() -> String {
    "members".to_string()
}

fn default_registrations_collection() -> String {
    "registers".to_string()
}

fn default_counters_collection() -> String {
    "counters".to_string()
}

/// Listing defaults for both collections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_size: u64,
    /// Optional cap on `size`. Unset means callers may ask for any page size.
    #[serde(default)]
    pub max_size: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
            max_size: None,
        }
    }
}

fn default_page_size() -> u64 {
    crate::query::LIST_PAGE_SIZE
}

/// How registration sequential identifiers are allocated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocatorKind {
    /// Read the current maximum and add one
    #[default]
    MaxPlusOne,
    /// Atomic increment of a counter document
    Counter,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    #[serde(default)]
    pub allocator: AllocatorKind,
    #[serde(default = "default_first_sequential_id")]
    pub first_sequential_id: i64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            allocator: AllocatorKind::default(),
            first_sequential_id: default_first_sequential_id(),
        }
    }
}

fn default_first_sequential_id() -> i64 {
    crate::allocator::FIRST_SEQUENTIAL_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.server.max_payload_bytes, 1024 * 1024);
        assert_eq!(config.database.backend, StoreBackend::Mongo);
        assert_eq!(config.database.registrations_collection, "registers");
        assert_eq!(config.pagination.default_size, 50);
        assert!(config.pagination.max_size.is_none());
        assert_eq!(config.registration.allocator, AllocatorKind::MaxPlusOne);
        assert_eq!(config.registration.first_sequential_id, 200);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[database]
backend = "memory"

[registration]
allocator = "counter"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.database.members_collection, "members");
        assert_eq!(config.registration.allocator, AllocatorKind::Counter);
        assert_eq!(config.registration.first_sequential_id, 200);
    }
}
