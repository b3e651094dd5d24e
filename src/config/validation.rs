use super::models::{Config, StoreBackend};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("pagination.default_size must be positive")]
    ZeroDefaultPageSize,

    #[error("pagination.max_size must be positive when set")]
    ZeroMaxPageSize,

    #[error("pagination.default_size ({default}) exceeds pagination.max_size ({max})")]
    DefaultExceedsMax { default: u64, max: u64 },

    #[error("server.max_payload_bytes must be positive")]
    ZeroPayloadLimit,

    #[error("Collection name for '{field}' must not be empty")]
    EmptyCollectionName { field: &'static str },

    #[error("Collection '{name}' is configured more than once")]
    DuplicateCollection { name: String },

    #[error("Invalid MongoDB URI scheme in '{uri}', expected 'mongodb://' or 'mongodb+srv://'")]
    InvalidMongoUri { uri: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_pagination(config)?;
    validate_database(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_payload_bytes == 0 {
        return Err(ValidationError::ZeroPayloadLimit);
    }
    Ok(())
}

/// Page size defaults must be usable, and the optional cap must admit the default
fn validate_pagination(config: &Config) -> Result<(), ValidationError> {
    let pagination = &config.pagination;

    if pagination.default_size == 0 {
        return Err(ValidationError::ZeroDefaultPageSize);
    }

    if let Some(max) = pagination.max_size {
        if max == 0 {
            return Err(ValidationError::ZeroMaxPageSize);
        }
        if pagination.default_size > max {
            return Err(ValidationError::DefaultExceedsMax {
                default: pagination.default_size,
                max,
            });
        }
    }

    Ok(())
}

fn validate_database(config: &Config) -> Result<(), ValidationError> {
    let db = &config.database;

    let collections = [
        ("members_collection", &db.members_collection),
        ("registrations_collection", &db.registrations_collection),
        ("counters_collection", &db.counters_collection),
    ];

    let mut seen = HashSet::new();
    for (field, name) in collections {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyCollectionName { field });
        }
        if !seen.insert(name.as_str()) {
            return Err(ValidationError::DuplicateCollection { name: name.clone() });
        }
    }

    if db.backend == StoreBackend::Mongo
        && !db.uri.starts_with("mongodb://")
        && !db.uri.starts_with("mongodb+srv://")
    {
        return Err(ValidationError::InvalidMongoUri { uri: db.uri.clone() });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_default_size() {
        let mut config = Config::default();
        config.pagination.default_size = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::ZeroDefaultPageSize)));
    }

    #[test]
    fn test_default_exceeds_cap() {
        let mut config = Config::default();
        config.pagination.max_size = Some(10);

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::DefaultExceedsMax { default: 50, max: 10 })
        ));
    }

    #[test]
    fn test_duplicate_collections() {
        let mut config = Config::default();
        config.database.counters_collection = "members".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::DuplicateCollection { .. })));
    }

    #[test]
    fn test_empty_collection_name() {
        let mut config = Config::default();
        config.database.registrations_collection = "  ".to_string();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::EmptyCollectionName { field: "registrations_collection" })
        ));
    }

    #[test]
    fn test_invalid_mongo_uri() {
        let mut config = Config::default();
        config.database.uri = "postgres://localhost".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::InvalidMongoUri { .. })));
    }

    #[test]
    fn test_memory_backend_skips_uri_check() {
        let mut config = Config::default();
        config.database.backend = StoreBackend::Memory;
        config.database.uri = String::new();

        assert!(validate(&config).is_ok());
    }
}
