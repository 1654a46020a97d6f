//! Handlers for the `/clients` resource.
//!
//! Clients are never hard-deleted; `DELETE` archives the row so history
//! (appointments, contracts, interactions) stays intact.

use atrio_core::client::ClientStatus;
use atrio_core::error::CoreError;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use atrio_db::models::client::{Client, ClientQuery, CreateClient, UpdateClient};
use atrio_db::repositories::ClientRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<DataResponse<Client>>)> {
    let client = ClientRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/clients
///
/// Paginated listing with optional `status`, `assigned_to`, and free-text
/// `q` filters (`q` matches name, email, and company).
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ClientQuery>,
) -> AppResult<Json<PagedResponse<Client>>> {
    if let Some(status) = &params.status {
        ClientStatus::parse(status)?;
    }

    let data = ClientRepo::list(&state.pool, &params).await?;
    let total = ClientRepo::count(&state.pool, &params).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(DataResponse { data: client }))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    if let Some(status) = &input.status {
        ClientStatus::parse(status)?;
    }

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(DataResponse { data: client }))
}

/// DELETE /api/v1/clients/{id}
///
/// Archive the client instead of deleting it. Idempotent: archiving an
/// already-archived client is a no-op 204. Manager or admin only.
pub async fn archive(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let archived = ClientRepo::archive(&state.pool, id).await?;
    if archived {
        return Ok(StatusCode::NO_CONTENT);
    }

    // No row flipped: either the client is gone or it was already archived.
    match ClientRepo::find_by_id(&state.pool, id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        })),
    }
}
