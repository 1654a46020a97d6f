//! Handlers for the `/contracts` resource.
//!
//! Contract money amounts are integer cents end to end. Status moves
//! through the `atrio_core::billing` transition table; entering `signed`
//! stamps `signed_at` in the repository.

use atrio_core::billing::ContractStatus;
use atrio_core::error::CoreError;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use atrio_db::models::contract::{Contract, ContractQuery, CreateContract, UpdateContract};
use atrio_db::repositories::ContractRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Request body for `PUT /contracts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

/// POST /api/v1/contracts
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<DataResponse<Contract>>)> {
    if input.value_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Contract value must not be negative".into(),
        )));
    }

    let contract = ContractRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: contract })))
}

/// GET /api/v1/contracts
///
/// Paginated listing with optional `client_id` and `status` filters.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ContractQuery>,
) -> AppResult<Json<PagedResponse<Contract>>> {
    if let Some(status) = &params.status {
        ContractStatus::parse(status)?;
    }

    let data = ContractRepo::list(&state.pool, &params).await?;
    let total = ContractRepo::count(&state.pool, &params).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let contract = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))?;
    Ok(Json(DataResponse { data: contract }))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<DataResponse<Contract>>> {
    if let Some(value) = input.value_cents {
        if value < 0 {
            return Err(AppError::Core(CoreError::Validation(
                "Contract value must not be negative".into(),
            )));
        }
    }

    let contract = ContractRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))?;
    Ok(Json(DataResponse { data: contract }))
}

/// PUT /api/v1/contracts/{id}/status
///
/// Walk the contract lifecycle (`draft` -> `sent` -> `signed` ->
/// `active` -> `completed`, `cancelled` from any non-terminal state).
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Contract>>> {
    let target = ContractStatus::parse(&input.status)?;

    let contract = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))?;

    let current = ContractStatus::parse(&contract.status)?;
    current.validate_transition(target)?;

    let updated = ContractRepo::update_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/contracts/{id}
///
/// Delete a contract. Rejected with 409 while charges still reference
/// it (foreign key RESTRICT). Manager or admin only.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ContractRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id,
        }))
    }
}
