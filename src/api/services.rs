use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::collections::HashMap;

use super::{error::ApiError, models::ApiResponse, state::AppState, utils::read_json};
use crate::handlers::{CreateMembersRequest, CreateRegistrationRequest};
use crate::query::ListParams;
use crate::records::{RegistrationPatch, RosterMemberPatch};

const FETCHED: &str = "Data fetched successfully!";
const UPDATED: &str = "Member updated successfully!";
const DELETED: &str = "Member deleted successfully!";

/// Count the failure and convert it into a response error
fn reject(state: &AppState, err: impl Into<ApiError>) -> ApiError {
    state.metrics.request_failed();
    err.into()
}

fn list_params(query: Result<Query<ListParams>, QueryRejection>) -> Result<ListParams, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::InvalidPayload(rejection.body_text()))
}

/// Roster batch creation (POST /api/members)
///
/// Every record in the batch shares `groupId` and gets
/// `groupMemberCount` equal to the batch length. Returns 201 with the
/// inserted records.
pub async fn create_members(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.config.server.max_payload_bytes;
    let request: CreateMembersRequest = read_json(&headers, body, limit)
        .await
        .map_err(|e| reject(&state, e))?;

    let created = state
        .roster
        .create(request)
        .await
        .map_err(|e| reject(&state, e))?;
    state.metrics.records_created(created.len() as u64);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Members created successfully!", created)),
    ))
}

/// Roster listing (GET /api/members)
///
/// Query: `page, size, groupId (or wymaNumber), sex, name, minAge, maxAge`
pub async fn list_members(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = list_params(query).map_err(|e| reject(&state, e))?;
    let page = state
        .roster
        .list(params)
        .await
        .map_err(|e| reject(&state, e))?;

    Ok(Json(ApiResponse::new(FETCHED, page.items).with_page(page.info)))
}

/// Roster member update (PUT /api/members/{id})
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.config.server.max_payload_bytes;
    let patch: RosterMemberPatch = read_json(&headers, body, limit)
        .await
        .map_err(|e| reject(&state, e))?;

    let updated = state
        .roster
        .update(&id, patch)
        .await
        .map_err(|e| reject(&state, e))?;
    state.metrics.record_updated();

    Ok(Json(ApiResponse::new(UPDATED, updated)))
}

/// Roster member removal (DELETE /api/members/{id})
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .roster
        .delete(&id)
        .await
        .map_err(|e| reject(&state, e))?;
    state.metrics.record_deleted();

    Ok(Json(ApiResponse::new(DELETED, deleted)))
}

/// Self registration (POST /api/registrations)
///
/// Allocates the next sequential identifier and returns it as
/// `wymaNumber` next to the inserted record.
pub async fn create_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.config.server.max_payload_bytes;
    let request: CreateRegistrationRequest = read_json(&headers, body, limit)
        .await
        .map_err(|e| reject(&state, e))?;

    let created = state
        .registrations
        .create(request)
        .await
        .map_err(|e| reject(&state, e))?;
    state.metrics.records_created(1);

    let response = ApiResponse::new("Member created successfully!", created.record)
        .with_wyma_number(created.sequential_id);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Registration listing (GET /api/registrations)
///
/// Query: `page, size, sequentialId (or wymaNumber), sex, name, minAge, maxAge`
pub async fn list_registrations(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = list_params(query).map_err(|e| reject(&state, e))?;
    let page = state
        .registrations
        .list(params)
        .await
        .map_err(|e| reject(&state, e))?;

    Ok(Json(ApiResponse::new(FETCHED, page.items).with_page(page.info)))
}

/// Registration update (PUT /api/registrations/{id})
pub async fn update_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    let limit = state.config.server.max_payload_bytes;
    let patch: RegistrationPatch = read_json(&headers, body, limit)
        .await
        .map_err(|e| reject(&state, e))?;

    let updated = state
        .registrations
        .update(&id, patch)
        .await
        .map_err(|e| reject(&state, e))?;
    state.metrics.record_updated();

    Ok(Json(ApiResponse::new(UPDATED, updated)))
}

/// Registration removal (DELETE /api/registrations/{id})
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .registrations
        .delete(&id)
        .await
        .map_err(|e| reject(&state, e))?;
    state.metrics.record_deleted();

    Ok(Json(ApiResponse::new(DELETED, deleted)))
}

/// Health check endpoint (GET /health)
///
/// Pings MongoDB when it backs the store. Returns 503 Service Unavailable
/// if any component is unhealthy, 200 OK otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());

    let store_status = match &state.database {
        Some(connection) => match connection.ping().await {
            Ok(()) => "healthy".to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "Health check ping failed");
                "unhealthy".to_string()
            }
        },
        None => "healthy".to_string(),
    };
    components.insert("store".to_string(), store_status);

    let all_healthy = components.values().all(|status| status == "healthy");
    let (status_code, overall_status) = if all_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let response = super::models::HealthResponse {
        status: overall_status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        counters: state.metrics.snapshot(),
    };

    (status_code, Json(response))
}
