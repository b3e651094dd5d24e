use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::validation::{CreateMembersRequest, validate_member_patch, validate_members};
use super::{HandlerError, Page, list_page, to_changes};
use crate::config::PaginationConfig;
use crate::query::{IdentifierKind, ListParams};
use crate::records::{RosterMember, RosterMemberPatch};
use crate::store::RecordStore;

/// Approved-member roster operations
#[derive(Clone)]
pub struct RosterHandler {
    store: Arc<dyn RecordStore<RosterMember>>,
    pagination: PaginationConfig,
}

impl RosterHandler {
    pub fn new(store: Arc<dyn RecordStore<RosterMember>>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Insert one batch. Every record gets the batch's group identifier and
    /// `groupMemberCount` equal to the batch length.
    pub async fn create(
        &self,
        request: CreateMembersRequest,
    ) -> Result<Vec<RosterMember>, HandlerError> {
        let (group_id, members) = validate_members(request)?;
        let records = RosterMember::batch(&group_id, members, Utc::now());

        let saved = self
            .store
            .insert_many(records)
            .await
            .map_err(HandlerError::storage("create members"))?;

        info!(group_id = %group_id, count = saved.len(), "Roster batch created");
        Ok(saved)
    }

    pub async fn list(&self, params: ListParams) -> Result<Page<RosterMember>, HandlerError> {
        let query = params.parse(IdentifierKind::Group)?;
        list_page(self.store.as_ref(), query, &self.pagination).await
    }

    /// Group identifier and member count cannot be changed here.
    pub async fn update(
        &self,
        id: &str,
        patch: RosterMemberPatch,
    ) -> Result<RosterMember, HandlerError> {
        validate_member_patch(&patch)?;
        let changes = to_changes(&patch, "update member")?;

        let updated = self
            .store
            .update_by_id(id, changes)
            .await
            .map_err(HandlerError::storage("update member"))?
            .ok_or_else(|| HandlerError::NotFound("member".to_string()))?;

        info!(id, "Roster member updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<RosterMember, HandlerError> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .map_err(HandlerError::storage("delete member"))?
            .ok_or_else(|| HandlerError::NotFound("member".to_string()))?;

        info!(id, group_id = %deleted.group_id, "Roster member deleted");
        Ok(deleted)
    }
}
