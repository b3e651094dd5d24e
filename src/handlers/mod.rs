//! Resource handlers for the two rosters
//!
//! Each handler maps one operation onto the store and owns the decisions
//! around it: input validation, batch stamping, identifier allocation,
//! filtering and paging.
//!
//! ## Key Components
//!
//! - [`RosterHandler`] - approved members, created in batches per group
//! - [`RegistrationHandler`] - self registrations with sequential identifiers
//! - [`HandlerError`] - `InvalidInput`, `NotFound` or `StorageFailure`
//!
//! ## Example
//!
//! ```rust,ignore
//! use rosterbox::handlers::RosterHandler;
//!
//! let handler = RosterHandler::new(store, pagination);
//! let created = handler.create(request).await?;
//! let page = handler.list(params).await?;
//! ```

mod error;
mod registration;
mod roster;
pub mod validation;

pub use error::HandlerError;
pub use registration::{CreatedRegistration, RegistrationHandler};
pub use roster::RosterHandler;
pub use validation::{CreateMembersRequest, CreateRegistrationRequest, InputError};

use serde::Serialize;

use crate::config::PaginationConfig;
use crate::query::{ListQuery, PageInfo, PageWindow};
use crate::records::Record;
use crate::store::{Changes, RecordStore, StoreError};

/// One page of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

pub(crate) async fn list_page<T: Record>(
    store: &dyn RecordStore<T>,
    query: ListQuery,
    pagination: &PaginationConfig,
) -> Result<Page<T>, HandlerError> {
    let window = PageWindow::with_default(query.page, query.size, pagination.default_size)
        .capped(query.page, pagination.max_size);
    let filter = query.criteria.to_filter();

    let items = store
        .find(&filter, window)
        .await
        .map_err(HandlerError::storage("fetch data"))?;
    let total_items = store
        .count(&filter)
        .await
        .map_err(HandlerError::storage("fetch data"))?;

    tracing::debug!(
        limit = window.limit,
        offset = window.offset,
        returned = items.len(),
        total_items,
        "Listed records"
    );

    Ok(Page {
        items,
        info: PageInfo::new(total_items, window.limit, query.current_page()),
    })
}

/// Stored-field assignments for an update patch; absent fields are skipped
pub(crate) fn to_changes<P: Serialize>(
    patch: &P,
    action: &'static str,
) -> Result<Changes, HandlerError> {
    match serde_json::to_value(patch) {
        Ok(serde_json::Value::Object(changes)) => Ok(changes),
        Ok(other) => Err(HandlerError::InvalidInput(format!(
            "update must be an object, got {other}"
        ))),
        Err(err) => Err(HandlerError::storage(action)(StoreError::Serialization(err))),
    }
}
