//! Handlers for the `/charges` resource and its nested payments.
//!
//! A charge is an amount owed by a client, optionally tied to a contract.
//! Payments are recorded against a charge; once the paid total covers the
//! amount the charge flips to `paid` inside the same transaction. The
//! mark-overdue sweep is the admin-triggered batch counterpart.

use atrio_core::billing::{ChargeStatus, PaymentMethod};
use atrio_core::error::CoreError;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use atrio_db::models::charge::{Charge, ChargeQuery, CreateCharge};
use atrio_db::models::payment::{Payment, PaymentOutcome, RecordPayment, RecordedPayment};
use atrio_db::repositories::{ChargeRepo, PaymentRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Response body for `POST /charges/mark-overdue`.
#[derive(Debug, Serialize)]
pub struct MarkOverdueResponse {
    /// Number of charges flipped from `pending` to `overdue`.
    pub marked: u64,
}

// ---------------------------------------------------------------------------
// Charges
// ---------------------------------------------------------------------------

/// POST /api/v1/charges
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateCharge>,
) -> AppResult<(StatusCode, Json<DataResponse<Charge>>)> {
    if input.amount_cents <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Charge amount must be positive".into(),
        )));
    }

    let charge = ChargeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: charge })))
}

/// GET /api/v1/charges
///
/// Paginated listing ordered by due date, with optional `client_id`,
/// `contract_id`, `status`, and `due_before` filters.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ChargeQuery>,
) -> AppResult<Json<PagedResponse<Charge>>> {
    if let Some(status) = &params.status {
        ChargeStatus::parse(status)?;
    }

    let data = ChargeRepo::list(&state.pool, &params).await?;
    let total = ChargeRepo::count(&state.pool, &params).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }))
}

/// GET /api/v1/charges/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Charge>>> {
    let charge = ChargeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Charge",
            id,
        }))?;
    Ok(Json(DataResponse { data: charge }))
}

/// POST /api/v1/charges/{id}/cancel
///
/// Cancel a `pending` or `overdue` charge. Settled charges (`paid`,
/// already `cancelled`) respond 409.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Charge>>> {
    if let Some(charge) = ChargeRepo::cancel(&state.pool, id).await? {
        return Ok(Json(DataResponse { data: charge }));
    }

    // Nothing flipped: distinguish a missing charge from a settled one.
    match ChargeRepo::find_by_id(&state.pool, id).await? {
        Some(charge) => Err(AppError::Core(CoreError::Conflict(format!(
            "Charge {id} is {} and cannot be cancelled",
            charge.status
        )))),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Charge",
            id,
        })),
    }
}

/// POST /api/v1/charges/mark-overdue
///
/// Flip every `pending` charge whose due date has passed to `overdue`.
/// Admin only; reports how many rows changed.
pub async fn mark_overdue(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<MarkOverdueResponse>>> {
    let marked = ChargeRepo::mark_overdue(&state.pool).await?;
    tracing::info!(marked, "Overdue sweep completed");
    Ok(Json(DataResponse {
        data: MarkOverdueResponse { marked },
    }))
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// POST /api/v1/charges/{id}/payments
///
/// Record a payment against a charge. Partial payments are fine; the
/// charge flips to `paid` once the paid total covers its amount.
/// Settled charges respond 409.
pub async fn record_payment(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<RecordPayment>,
) -> AppResult<(StatusCode, Json<DataResponse<RecordedPayment>>)> {
    if input.amount_cents <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Payment amount must be positive".into(),
        )));
    }
    PaymentMethod::parse(&input.method)?;

    match PaymentRepo::record(&state.pool, id, &input).await? {
        PaymentOutcome::Recorded(recorded) => {
            Ok((StatusCode::CREATED, Json(DataResponse { data: *recorded })))
        }
        PaymentOutcome::ChargeNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Charge",
            id,
        })),
        PaymentOutcome::NotPayable { status } => Err(AppError::Core(CoreError::Conflict(
            format!("Charge {id} is {status} and accepts no payments"),
        ))),
    }
}

/// GET /api/v1/charges/{id}/payments
///
/// All payments recorded against a charge, oldest first.
pub async fn list_payments(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    // 404 for a charge that does not exist, empty list otherwise.
    ChargeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Charge",
            id,
        }))?;

    let payments = PaymentRepo::list_for_charge(&state.pool, id).await?;
    Ok(Json(DataResponse { data: payments }))
}
