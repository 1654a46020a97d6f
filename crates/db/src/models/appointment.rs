//! Appointment entity model and DTOs.

use atrio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An appointment row from the `appointments` table.
///
/// The end instant is derived, not stored: `starts_at + duration_mins`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub client_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub duration_mins: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new appointment.
#[derive(Debug, Deserialize)]
pub struct CreateAppointment {
    pub client_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub duration_mins: i32,
}

/// DTO for updating an existing appointment. All fields are optional;
/// status changes only through the status endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAppointment {
    pub client_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub duration_mins: Option<i32>,
}

/// Outcome of a conflict-checked create or reschedule.
#[derive(Debug)]
pub enum BookingOutcome {
    /// The write went through; no blocking appointment overlapped.
    Booked(Box<Appointment>),
    /// A blocking appointment for the same assignee overlaps the window.
    Conflict,
    /// No appointment with the given id exists (reschedule only).
    NotFound,
}

/// Filter parameters for the appointment list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub assigned_to: Option<DbId>,
    pub client_id: Option<DbId>,
    pub status: Option<String>,
    /// Only appointments starting at or after this instant.
    pub from: Option<Timestamp>,
    /// Only appointments starting before this instant.
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
