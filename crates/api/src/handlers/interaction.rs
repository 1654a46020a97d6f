//! Handlers for interaction logs under `/leads/{id}/interactions` and
//! `/clients/{id}/interactions`, plus standalone deletion.
//!
//! The subject comes from the route and the author from the JWT; the
//! body only carries what happened and when.

use atrio_core::error::CoreError;
use atrio_core::interaction::{InteractionKind, SubjectType};
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use atrio_db::models::interaction::{CreateInteraction, Interaction};
use atrio_db::repositories::{ClientRepo, InteractionRepo, LeadRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// POST /api/v1/leads/{id}/interactions
pub async fn create_for_lead(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<CreateInteraction>,
) -> AppResult<(StatusCode, Json<DataResponse<Interaction>>)> {
    ensure_lead_exists(&state, id).await?;
    create_interaction(&state, SubjectType::Lead, id, user.user_id, input).await
}

/// GET /api/v1/leads/{id}/interactions
pub async fn list_for_lead(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PagedResponse<Interaction>>> {
    ensure_lead_exists(&state, id).await?;
    list_interactions(&state, SubjectType::Lead, id, params).await
}

/// POST /api/v1/clients/{id}/interactions
pub async fn create_for_client(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<CreateInteraction>,
) -> AppResult<(StatusCode, Json<DataResponse<Interaction>>)> {
    ensure_client_exists(&state, id).await?;
    create_interaction(&state, SubjectType::Client, id, user.user_id, input).await
}

/// GET /api/v1/clients/{id}/interactions
pub async fn list_for_client(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PagedResponse<Interaction>>> {
    ensure_client_exists(&state, id).await?;
    list_interactions(&state, SubjectType::Client, id, params).await
}

/// DELETE /api/v1/interactions/{id}
///
/// Remove a single interaction entry. Manager or admin only.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = InteractionRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Interaction",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_lead_exists(state: &AppState, id: DbId) -> AppResult<()> {
    LeadRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Lead", id }))?;
    Ok(())
}

async fn ensure_client_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(())
}

async fn create_interaction(
    state: &AppState,
    subject: SubjectType,
    subject_id: DbId,
    user_id: DbId,
    input: CreateInteraction,
) -> AppResult<(StatusCode, Json<DataResponse<Interaction>>)> {
    InteractionKind::parse(&input.kind)?;

    let interaction = InteractionRepo::create(
        &state.pool,
        subject.as_str(),
        subject_id,
        user_id,
        &input,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: interaction }),
    ))
}

async fn list_interactions(
    state: &AppState,
    subject: SubjectType,
    subject_id: DbId,
    params: PaginationParams,
) -> AppResult<Json<PagedResponse<Interaction>>> {
    let data = InteractionRepo::list_for_subject(
        &state.pool,
        subject.as_str(),
        subject_id,
        params.limit,
        params.offset,
    )
    .await?;
    let total =
        InteractionRepo::count_for_subject(&state.pool, subject.as_str(), subject_id).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }))
}
