//! Contract entity model and DTOs.

use atrio_core::types::{Cents, DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A contract row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub client_id: DbId,
    pub title: String,
    pub description: Option<String>,
    /// Total contract value in integer cents.
    pub value_cents: Cents,
    pub status: String,
    pub signed_at: Option<Timestamp>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new contract.
#[derive(Debug, Deserialize)]
pub struct CreateContract {
    pub client_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub value_cents: Cents,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

/// DTO for updating an existing contract. All fields are optional;
/// status changes only through the status endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateContract {
    pub title: Option<String>,
    pub description: Option<String>,
    pub value_cents: Option<Cents>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

/// Filter parameters for the contract list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ContractQuery {
    pub client_id: Option<DbId>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
