//! Charge entity model and DTOs.

use atrio_core::types::{Cents, DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A charge row from the `charges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Charge {
    pub id: DbId,
    pub client_id: DbId,
    pub contract_id: Option<DbId>,
    pub description: String,
    /// Amount owed in integer cents.
    pub amount_cents: Cents,
    pub due_on: NaiveDate,
    /// `"pending"`, `"paid"`, `"overdue"` or `"cancelled"`.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new charge.
#[derive(Debug, Deserialize)]
pub struct CreateCharge {
    pub client_id: DbId,
    pub contract_id: Option<DbId>,
    pub description: String,
    pub amount_cents: Cents,
    pub due_on: NaiveDate,
}

/// Filter parameters for the charge list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ChargeQuery {
    pub client_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub status: Option<String>,
    /// Only charges due on or before this date.
    pub due_before: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
