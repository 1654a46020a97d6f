//! Handlers for the `/appointments` resource.
//!
//! Create and reschedule run the double-booking check: a window that
//! overlaps a blocking appointment (`scheduled` or `confirmed`) for the
//! same assignee is rejected with 409 before anything is written.

use atrio_core::error::CoreError;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::scheduling::{self, AppointmentStatus, TimeWindow};
use atrio_core::types::DbId;
use atrio_db::models::appointment::{
    Appointment, AppointmentQuery, BookingOutcome, CreateAppointment, UpdateAppointment,
};
use atrio_db::repositories::AppointmentRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireManager};
use crate::response::{DataResponse, PagedResponse};
use crate::state::AppState;

/// Request body for `PUT /appointments/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

/// POST /api/v1/appointments
///
/// Book an appointment. 409 when the window overlaps a blocking
/// appointment for the same assignee; unassigned appointments are
/// never conflict-checked.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<CreateAppointment>,
) -> AppResult<(StatusCode, Json<DataResponse<Appointment>>)> {
    TimeWindow::new(input.starts_at, input.duration_mins)?;

    match AppointmentRepo::create(&state.pool, &input).await? {
        BookingOutcome::Booked(appointment) => Ok((
            StatusCode::CREATED,
            Json(DataResponse { data: *appointment }),
        )),
        BookingOutcome::Conflict => Err(booking_conflict()),
        BookingOutcome::NotFound => Err(AppError::InternalError(
            "Booking reported a missing row on create".into(),
        )),
    }
}

/// GET /api/v1/appointments
///
/// Paginated listing ordered by start time, with optional `assigned_to`,
/// `client_id`, `status`, and `from`/`to` window filters.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<AppointmentQuery>,
) -> AppResult<Json<PagedResponse<Appointment>>> {
    if let Some(status) = &params.status {
        AppointmentStatus::parse(status)?;
    }

    let data = AppointmentRepo::list(&state.pool, &params).await?;
    let total = AppointmentRepo::count(&state.pool, &params).await?;

    Ok(Json(PagedResponse {
        data,
        total,
        limit: clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        offset: clamp_offset(params.offset),
    }))
}

/// GET /api/v1/appointments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let appointment = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;
    Ok(Json(DataResponse { data: appointment }))
}

/// PUT /api/v1/appointments/{id}
///
/// Reschedule or reassign. The merged result is conflict-checked against
/// the target assignee's calendar, excluding this appointment itself.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAppointment>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    if let Some(mins) = input.duration_mins {
        scheduling::validate_duration(mins)?;
    }

    match AppointmentRepo::update(&state.pool, id, &input).await? {
        BookingOutcome::Booked(appointment) => Ok(Json(DataResponse { data: *appointment })),
        BookingOutcome::Conflict => Err(booking_conflict()),
        BookingOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        })),
    }
}

/// PUT /api/v1/appointments/{id}/status
///
/// Walk the appointment lifecycle (`scheduled` -> `confirmed` ->
/// `completed` / `cancelled` / `no_show`). Terminal statuses accept no
/// further transitions.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeRequest>,
) -> AppResult<Json<DataResponse<Appointment>>> {
    let target = AppointmentStatus::parse(&input.status)?;

    let appointment = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;

    let current = AppointmentStatus::parse(&appointment.status)?;
    current.validate_transition(target)?;

    let updated = AppointmentRepo::update_status(&state.pool, id, target.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/appointments/{id}
///
/// Remove an appointment outright. Manager or admin only; cancelling is
/// usually the better option since it keeps the record.
pub async fn delete(
    State(state): State<AppState>,
    RequireManager(_user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = AppointmentRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))
    }
}

/// Shared 409 for both booking paths.
fn booking_conflict() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Appointment overlaps an existing appointment for this assignee".into(),
    ))
}
