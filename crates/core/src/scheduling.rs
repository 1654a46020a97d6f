//! Appointment status vocabulary and the booking-conflict rule.
//!
//! Two appointments for the same assignee conflict when their half-open
//! time windows `[starts_at, starts_at + duration)` overlap and both are
//! in a blocking status. The overlap test is the single inequality
//! `startA < endB AND startB < endA`; windows that merely touch
//! (`endA == startB`) do not conflict.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_NO_SHOW: &str = "no_show";

/// All valid appointment statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_SCHEDULED,
    STATUS_CONFIRMED,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
    STATUS_NO_SHOW,
];

/// Statuses that participate in conflict checks. Everything else
/// (`completed`, `cancelled`, `no_show`) never blocks a new booking.
pub const BLOCKING_STATUSES: &[&str] = &[STATUS_SCHEDULED, STATUS_CONFIRMED];

// ---------------------------------------------------------------------------
// Advisory lock key
// ---------------------------------------------------------------------------

/// Namespace for per-assignee booking locks, XORed with the assignee id to
/// form a `pg_advisory_xact_lock` key. Conflict check and insert run under
/// this lock in one transaction so concurrent overlapping requests
/// serialize instead of double-booking.
pub const BOOKING_LOCK_NS: i64 = 551_230_700;

/// Advisory lock key for booking operations on one assignee's calendar.
pub fn booking_lock_key(assignee_id: DbId) -> i64 {
    BOOKING_LOCK_NS ^ assignee_id
}

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Appointment lifecycle status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => STATUS_SCHEDULED,
            Self::Confirmed => STATUS_CONFIRMED,
            Self::Completed => STATUS_COMPLETED,
            Self::Cancelled => STATUS_CANCELLED,
            Self::NoShow => STATUS_NO_SHOW,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_SCHEDULED => Ok(Self::Scheduled),
            STATUS_CONFIRMED => Ok(Self::Confirmed),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_CANCELLED => Ok(Self::Cancelled),
            STATUS_NO_SHOW => Ok(Self::NoShow),
            other => Err(CoreError::Validation(format!(
                "Unknown appointment status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether this status blocks other bookings in the same window.
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }

    /// Returns the set of statuses reachable from `self`.
    ///
    /// Terminal statuses (`completed`, `cancelled`, `no_show`) return an
    /// empty slice because no further transitions are allowed.
    pub fn valid_transitions(self) -> &'static [AppointmentStatus] {
        match self {
            Self::Scheduled => &[
                Self::Confirmed,
                Self::Completed,
                Self::Cancelled,
                Self::NoShow,
            ],
            Self::Confirmed => &[Self::Completed, Self::Cancelled, Self::NoShow],
            Self::Completed | Self::Cancelled | Self::NoShow => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning a descriptive error for invalid ones.
    pub fn validate_transition(self, to: AppointmentStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid appointment transition: {} -> {}",
                self.as_str(),
                to.as_str()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Time windows
// ---------------------------------------------------------------------------

/// Half-open appointment window `[starts_at, starts_at + duration_mins)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub starts_at: Timestamp,
    pub duration_mins: i32,
}

/// Reject non-positive appointment durations.
pub fn validate_duration(duration_mins: i32) -> Result<(), CoreError> {
    if duration_mins <= 0 {
        return Err(CoreError::Validation(format!(
            "Appointment duration must be positive, got {duration_mins} minutes"
        )));
    }
    Ok(())
}

impl TimeWindow {
    /// Build a window, rejecting non-positive durations.
    pub fn new(starts_at: Timestamp, duration_mins: i32) -> Result<Self, CoreError> {
        validate_duration(duration_mins)?;
        Ok(Self {
            starts_at,
            duration_mins,
        })
    }

    /// The derived (exclusive) end instant.
    pub fn ends_at(&self) -> Timestamp {
        self.starts_at + Duration::minutes(i64::from(self.duration_mins))
    }

    /// Half-open overlap test: true iff the windows share any instant.
    /// Symmetric; windows that touch end-to-start do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.starts_at < other.ends_at() && other.starts_at < self.ends_at()
    }
}
