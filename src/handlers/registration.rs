use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::validation::{
    CreateRegistrationRequest, validate_registration, validate_registration_patch,
};
use super::{HandlerError, Page, list_page, to_changes};
use crate::allocator::IdAllocator;
use crate::config::PaginationConfig;
use crate::query::{IdentifierKind, ListParams};
use crate::records::{Registration, RegistrationPatch};
use crate::store::RecordStore;

/// Result of a registration: the allocated identifier and the stored record
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRegistration {
    pub sequential_id: i64,
    pub record: Registration,
}

/// Self-registration roster operations
#[derive(Clone)]
pub struct RegistrationHandler {
    store: Arc<dyn RecordStore<Registration>>,
    allocator: Arc<dyn IdAllocator>,
    pagination: PaginationConfig,
}

impl RegistrationHandler {
    pub fn new(
        store: Arc<dyn RecordStore<Registration>>,
        allocator: Arc<dyn IdAllocator>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            store,
            allocator,
            pagination,
        }
    }

    /// Validate, allocate the next sequential identifier, then insert.
    /// Nothing is inserted when allocation fails.
    pub async fn create(
        &self,
        request: CreateRegistrationRequest,
    ) -> Result<CreatedRegistration, HandlerError> {
        let registration = validate_registration(request)?;

        let sequential_id = self
            .allocator
            .next_id()
            .await
            .map_err(HandlerError::storage("create member"))?;

        let record = registration.into_record(sequential_id, Utc::now());
        self.store
            .insert_many(vec![record.clone()])
            .await
            .map_err(HandlerError::storage("create member"))?;

        info!(sequential_id, id = %record.id, "Registration created");
        Ok(CreatedRegistration {
            sequential_id,
            record,
        })
    }

    pub async fn list(&self, params: ListParams) -> Result<Page<Registration>, HandlerError> {
        let query = params.parse(IdentifierKind::Sequential)?;
        list_page(self.store.as_ref(), query, &self.pagination).await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: RegistrationPatch,
    ) -> Result<Registration, HandlerError> {
        validate_registration_patch(&patch)?;
        let changes = to_changes(&patch, "update member")?;

        let updated = self
            .store
            .update_by_id(id, changes)
            .await
            .map_err(HandlerError::storage("update member"))?
            .ok_or_else(|| HandlerError::NotFound("member".to_string()))?;

        info!(id, sequential_id = updated.sequential_id, "Registration updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Registration, HandlerError> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .map_err(HandlerError::storage("delete member"))?
            .ok_or_else(|| HandlerError::NotFound("member".to_string()))?;

        info!(id, sequential_id = deleted.sequential_id, "Registration deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{FIRST_SEQUENTIAL_ID, MaxPlusOne};
    use crate::records::Sex;
    use crate::store::{MemoryStore, Result as StoreResult, StoreError};
    use async_trait::async_trait;

    struct BrokenAllocator;

    #[async_trait]
    impl IdAllocator for BrokenAllocator {
        async fn next_id(&self) -> StoreResult<i64> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn handler() -> (RegistrationHandler, Arc<MemoryStore<Registration>>) {
        let store = Arc::new(MemoryStore::new());
        let allocator = Arc::new(MaxPlusOne::new(store.clone(), FIRST_SEQUENTIAL_ID));
        (
            RegistrationHandler::new(store.clone(), allocator, PaginationConfig::default()),
            store,
        )
    }

    fn request(name: &str, age: i64, sex: Sex) -> CreateRegistrationRequest {
        CreateRegistrationRequest {
            name: Some(name.to_string()),
            age: Some(age),
            phone: None,
            sex: Some(sex),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_200_and_count_up() {
        let (handler, _store) = handler();

        for n in 0..3 {
            let created = handler.create(request("C", 40, Sex::Other)).await.unwrap();
            assert_eq!(created.sequential_id, 200 + n);
            assert_eq!(created.record.sequential_id, created.sequential_id);
        }
    }

    #[tokio::test]
    async fn test_allocation_failure_inserts_nothing() {
        let store = Arc::new(MemoryStore::new());
        let handler = RegistrationHandler::new(
            store.clone(),
            Arc::new(BrokenAllocator),
            PaginationConfig::default(),
        );

        let err = handler.create(request("C", 40, Sex::Other)).await.unwrap_err();
        assert!(matches!(err, HandlerError::StorageFailure { action: "create member", .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_field_is_invalid_input() {
        let (handler, store) = handler();
        let err = handler
            .create(CreateRegistrationRequest {
                sex: None,
                ..request("C", 40, Sex::Other)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, HandlerError::InvalidInput(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_phone_and_delete() {
        let (handler, store) = handler();
        let created = handler.create(request("C", 40, Sex::Other)).await.unwrap();

        let updated = handler
            .update(
                &created.record.id,
                RegistrationPatch {
                    phone: Some(5550100),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, Some(5550100));
        assert_eq!(updated.sequential_id, 200);

        let deleted = handler.delete(&created.record.id).await.unwrap();
        assert_eq!(deleted.phone, Some(5550100));
        assert!(store.is_empty().await);
    }
}
