//! Repository for the `appointments` table with booking-conflict
//! enforcement.
//!
//! Create and reschedule run check-then-write inside one transaction
//! holding `pg_advisory_xact_lock` keyed on the assignee, so concurrent
//! overlapping requests for the same calendar serialize and at most one
//! wins. Appointments without an assignee are never conflict-checked.

use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::scheduling::{booking_lock_key, AppointmentStatus, BLOCKING_STATUSES};
use atrio_core::types::{DbId, Timestamp};
use chrono::Duration;
use sqlx::{PgConnection, PgPool};

use crate::models::appointment::{
    Appointment, AppointmentQuery, BookingOutcome, CreateAppointment, UpdateAppointment,
};
use crate::repositories::filter::{self, BindValue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, assigned_to, title, description, location, \
                        starts_at, duration_mins, status, created_at, updated_at";

/// Provides CRUD and conflict-checked booking operations for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment in status `scheduled`.
    ///
    /// When an assignee is set, the window is checked against that
    /// assignee's blocking appointments under the booking lock; an
    /// overlap reports [`BookingOutcome::Conflict`] and writes nothing.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<BookingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(assignee) = input.assigned_to {
            lock_calendar(&mut tx, assignee).await?;
            if has_conflict(&mut tx, assignee, input.starts_at, input.duration_mins, None).await? {
                return Ok(BookingOutcome::Conflict);
            }
        }

        let query = format!(
            "INSERT INTO appointments
                (client_id, assigned_to, title, description, location, starts_at, duration_mins)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(input.client_id)
            .bind(input.assigned_to)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.starts_at)
            .bind(input.duration_mins)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(BookingOutcome::Booked(Box::new(appointment)))
    }

    /// Find an appointment by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List appointments matching the given filters in calendar order.
    pub async fn list(
        pool: &PgPool,
        params: &AppointmentQuery,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let (where_clause, values, bind_idx) = build_appointment_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM appointments {where_clause} \
             ORDER BY starts_at ASC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = filter::bind_values(sqlx::query_as::<_, Appointment>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count appointments matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &AppointmentQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, values, _) = build_appointment_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM appointments {where_clause}");
        let q = filter::bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }

    /// Reschedule or reassign an appointment. Only non-`None` fields are
    /// applied; the status column is not touched here.
    ///
    /// The merged result (current row + changes) is conflict-checked
    /// against the final assignee's calendar, excluding the appointment
    /// itself, but only while the appointment is in a blocking status.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<BookingOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock_query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Appointment>(&lock_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(BookingOutcome::NotFound);
        };

        // Merge in Rust so the checked window and the written window are
        // the same values.
        let client_id = input.client_id.or(current.client_id);
        let assigned_to = input.assigned_to.or(current.assigned_to);
        let starts_at = input.starts_at.unwrap_or(current.starts_at);
        let duration_mins = input.duration_mins.unwrap_or(current.duration_mins);

        let blocking = AppointmentStatus::parse(&current.status)
            .map(AppointmentStatus::is_blocking)
            .unwrap_or(false);
        if blocking {
            if let Some(assignee) = assigned_to {
                lock_calendar(&mut tx, assignee).await?;
                if has_conflict(&mut tx, assignee, starts_at, duration_mins, Some(id)).await? {
                    return Ok(BookingOutcome::Conflict);
                }
            }
        }

        let query = format!(
            "UPDATE appointments SET
                client_id = $2,
                assigned_to = $3,
                title = $4,
                description = $5,
                location = $6,
                starts_at = $7,
                duration_mins = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let appointment = sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(client_id)
            .bind(assigned_to)
            .bind(input.title.as_deref().unwrap_or(&current.title))
            .bind(input.description.as_deref().or(current.description.as_deref()))
            .bind(input.location.as_deref().or(current.location.as_deref()))
            .bind(starts_at)
            .bind(duration_mins)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(BookingOutcome::Booked(Box::new(appointment)))
    }

    /// Write a new status. Transition validity is checked by the caller
    /// against the appointment's current status before calling this.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query =
            format!("UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an appointment. Returns `true` if the row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Take the per-assignee booking lock for the rest of the transaction.
async fn lock_calendar(tx: &mut PgConnection, assignee: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(booking_lock_key(assignee))
        .execute(tx)
        .await?;
    Ok(())
}

/// Check whether any blocking appointment for `assignee` overlaps the
/// half-open window `[starts_at, starts_at + duration_mins)`.
///
/// `exclude_id` drops the appointment being rescheduled from the
/// comparison so it does not conflict with itself.
async fn has_conflict(
    tx: &mut PgConnection,
    assignee: DbId,
    starts_at: Timestamp,
    duration_mins: i32,
    exclude_id: Option<DbId>,
) -> Result<bool, sqlx::Error> {
    let ends_at = starts_at + Duration::minutes(i64::from(duration_mins));
    let blocking = blocking_status_list();

    let exists = match exclude_id {
        Some(exclude) => {
            let query = format!(
                "SELECT EXISTS(
                    SELECT 1 FROM appointments
                     WHERE assigned_to = $1
                       AND id != $4
                       AND status IN ({blocking})
                       AND starts_at < $3
                       AND $2 < starts_at + make_interval(mins => duration_mins)
                 )"
            );
            sqlx::query_scalar::<_, bool>(&query)
                .bind(assignee)
                .bind(starts_at)
                .bind(ends_at)
                .bind(exclude)
                .fetch_one(tx)
                .await?
        }
        None => {
            let query = format!(
                "SELECT EXISTS(
                    SELECT 1 FROM appointments
                     WHERE assigned_to = $1
                       AND status IN ({blocking})
                       AND starts_at < $3
                       AND $2 < starts_at + make_interval(mins => duration_mins)
                 )"
            );
            sqlx::query_scalar::<_, bool>(&query)
                .bind(assignee)
                .bind(starts_at)
                .bind(ends_at)
                .fetch_one(tx)
                .await?
        }
    };

    Ok(exists)
}

/// Render the blocking status set as a quoted SQL list. The values come
/// from compile-time constants, never from user input.
fn blocking_status_list() -> String {
    BLOCKING_STATUSES
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a WHERE clause and bind values from `AppointmentQuery` filter
/// parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_appointment_filter(params: &AppointmentQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.assigned_to {
        conditions.push(format!("assigned_to = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::BigInt(user_id));
    }

    if let Some(client_id) = params.client_id {
        conditions.push(format!("client_id = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::BigInt(client_id));
    }

    if let Some(ref status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Text(status.clone()));
    }

    if let Some(from) = params.from {
        conditions.push(format!("starts_at >= ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("starts_at < ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Timestamp(to));
    }

    (filter::where_clause(&conditions), values, bind_idx)
}
