//! Lead entity model, DTOs and the conversion result types.

use atrio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::client::Client;

/// A lead row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Free-form acquisition channel (e.g. `"referral"`, `"website"`).
    pub source: Option<String>,
    pub status: String,
    pub assigned_to: Option<DbId>,
    /// Set once, by the conversion workflow.
    pub converted_client_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new lead.
#[derive(Debug, Deserialize)]
pub struct CreateLead {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
}

/// DTO for updating an existing lead. All fields are optional; status is
/// deliberately absent and changes only through the status endpoint or
/// the conversion workflow.
#[derive(Debug, Deserialize)]
pub struct UpdateLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub source: Option<String>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
}

/// Filter parameters for the lead list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LeadQuery {
    pub status: Option<String>,
    pub assigned_to: Option<DbId>,
    pub source: Option<String>,
    /// Case-insensitive substring match over name, email and company.
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Optional overrides for the client created by a conversion. Any field
/// left `None` falls back to the lead's own value.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub assigned_to: Option<DbId>,
    pub notes: Option<String>,
}

/// A completed lead conversion: the new client, the lead in its final
/// `converted` state, and how many interactions were re-pointed.
#[derive(Debug, Serialize)]
pub struct ConvertedLead {
    pub client: Client,
    pub lead: Lead,
    pub interactions_moved: u64,
}

/// Outcome of a conversion attempt.
#[derive(Debug)]
pub enum LeadConversion {
    /// The lead was promoted to a client.
    Converted(Box<ConvertedLead>),
    /// No lead with the given id exists.
    NotFound,
    /// The lead was already converted; no second client row is created.
    AlreadyConverted,
}
