//! Handlers for the `/leads` resource.
//!
//! Covers lead CRUD, the status workflow, and conversion to a client.
//! Status changes go through the transition table in `atrio_core::lead`;
//! plain updates never touch the status column.

use atrio_core::error::CoreError;
use atrio_core::lead::LeadStatus;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use atrio_db::models::lead::{
    ConvertLead, ConvertedLead, CreateLead, Lead, LeadConversion, LeadQuery, UpdateLead,
};
use atrio_db::repositories::LeadRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Request body for `PUT /leads/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

/// POST /api/v1/leads
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateLead>,
) -> AppResult<(StatusCode, Json<DataResponse<Lead>>)> {
    let lead = LeadRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: lead })))
}

/// GET /api/v1/leads
///
/// Paginated listing with optional `status`, `assigned_to`, `source`, and
/// free-text `q` filters (`q` matches name, email, and company).
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<LeadQuery>,
) -> AppResult<Json<PagedResponse<Lead>>> {
    if let Some(status) = &params.status {
        LeadStatus::parse(status)?;
    }

    let data = LeadRepo::list(&state.pool, &params).await?;
    let total = LeadRepo::count(&state.pool, &params).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(DataResponse { data: lead }))
}

/// PUT /api/v1/leads/{id}
///
/// Partial update of contact fields. The status column is not reachable
/// from here; use the status endpoint instead.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let lead = LeadRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(Json(DataResponse { data: lead }))
}

/// PUT /api/v1/leads/{id}/status
///
/// Move the lead along the pipeline. The requested status must be a valid
/// transition from the current one; `converted` is never accepted here
/// because only the conversion workflow produces it.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let target = LeadStatus::parse(&input.status)?;

    let lead = LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;

    let current = LeadStatus::parse(&lead.status)?;
    current.validate_transition(target)?;

    let updated = LeadRepo::update_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/leads/{id}
///
/// Hard-delete a lead together with its interaction log. Manager or
/// admin only.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = LeadRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Lead", id }))
    }
}

/// POST /api/v1/leads/{id}/convert
///
/// Promote a lead to a client. The request body may override any client
/// field; everything left out is carried over from the lead. Responds
/// 201 with the new client, the converted lead, and the number of
/// interactions moved. A lead that is already converted responds 409
/// without creating a second client.
pub async fn convert(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<ConvertLead>,
) -> AppResult<(StatusCode, Json<DataResponse<ConvertedLead>>)> {
    match LeadRepo::convert(&state.pool, id, &input).await? {
        LeadConversion::Converted(converted) => {
            Ok((StatusCode::CREATED, Json(DataResponse { data: *converted })))
        }
        LeadConversion::NotFound => {
            Err(AppError::Core(CoreError::NotFound { entity: "Lead", id }))
        }
        LeadConversion::AlreadyConverted => Err(AppError::Core(CoreError::Conflict(format!(
            "Lead {id} is already converted"
        )))),
    }
}
