use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// The API layer maps these onto HTTP statuses (404, 400, 409, 401, 403
/// in order of the variants below). State conflicts like a double booking
/// or a second conversion attempt are expected business outcomes and use
/// [`CoreError::Conflict`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
