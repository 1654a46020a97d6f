//! Client entity model and DTOs.

use atrio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    /// `"active"`, `"inactive"` or `"archived"`.
    pub status: String,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new client.
#[derive(Debug, Deserialize)]
pub struct CreateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
}

/// DTO for updating an existing client. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
}

/// Filter parameters for the client list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub status: Option<String>,
    pub assigned_to: Option<DbId>,
    /// Case-insensitive substring match over name, email and company.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
