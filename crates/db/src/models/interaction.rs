//! Interaction entity model and DTOs.
//!
//! Interactions attach to a lead or a client through the
//! `(subject_type, subject_id)` pair. Conversion re-points a lead's
//! interactions at the new client.

use atrio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An interaction row from the `interactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interaction {
    pub id: DbId,
    /// `"lead"` or `"client"`.
    pub subject_type: String,
    pub subject_id: DbId,
    /// The user who logged the interaction.
    pub user_id: DbId,
    /// `"call"`, `"email"`, `"meeting"` or `"note"`.
    pub kind: String,
    pub content: String,
    pub occurred_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for logging a new interaction. Subject and author come from the
/// route and the authenticated user, not the body.
#[derive(Debug, Deserialize)]
pub struct CreateInteraction {
    pub kind: String,
    pub content: String,
    /// Defaults to now when omitted.
    pub occurred_at: Option<Timestamp>,
}
