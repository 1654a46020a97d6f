//! Read-only aggregate shapes for the dashboard endpoints.

use atrio_core::types::{Cents, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Headline numbers for the dashboard landing view.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub leads_total: i64,
    /// Leads still in the pipeline (not won, lost or converted).
    pub leads_open: i64,
    pub clients_active: i64,
    /// Scheduled or confirmed appointments starting from now on.
    pub appointments_upcoming: i64,
    /// Sum of pending and overdue charge amounts, in cents.
    pub outstanding_cents: Cents,
    pub charges_overdue: i64,
}

/// One lead-funnel bucket: how many leads sit in a given status.
#[derive(Debug, FromRow, Serialize)]
pub struct LeadFunnelEntry {
    pub status: String,
    pub count: i64,
}

/// Paid revenue for one calendar month.
#[derive(Debug, FromRow, Serialize)]
pub struct MonthlyRevenueEntry {
    /// Month number, 1 through 12.
    pub month: i32,
    pub total_cents: Cents,
}

/// One recent-activity row: an interaction joined with its author and
/// the display name of its subject.
#[derive(Debug, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub subject_type: String,
    pub subject_id: DbId,
    pub subject_name: String,
    pub username: String,
    pub kind: String,
    pub content: String,
    pub occurred_at: Timestamp,
}
