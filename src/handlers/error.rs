use thiserror::Error;

use super::validation::InputError;
use crate::query::ParamError;
use crate::store::StoreError;

/// Failures of a handler operation
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid data provided: {0}")]
    InvalidInput(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("failed to {action}: {source}")]
    StorageFailure {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

impl HandlerError {
    /// Wrap a store error for `action`, logging it on the way out
    pub fn storage(action: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| {
            tracing::error!(action, error = %source, "Storage operation failed");
            HandlerError::StorageFailure { action, source }
        }
    }
}

impl From<InputError> for HandlerError {
    fn from(value: InputError) -> Self {
        HandlerError::InvalidInput(value.to_string())
    }
}

impl From<ParamError> for HandlerError {
    fn from(value: ParamError) -> Self {
        HandlerError::InvalidInput(value.to_string())
    }
}
