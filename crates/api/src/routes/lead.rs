//! Route definitions for the `/leads` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{interaction, lead};
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> delete (manager/admin)
/// PUT    /{id}/status        -> update_status
/// POST   /{id}/convert       -> convert
/// GET    /{id}/interactions  -> list_for_lead
/// POST   /{id}/interactions  -> create_for_lead
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lead::list).post(lead::create))
        .route(
            "/{id}",
            get(lead::get_by_id).put(lead::update).delete(lead::delete),
        )
        .route("/{id}/status", put(lead::update_status))
        .route("/{id}/convert", post(lead::convert))
        .route(
            "/{id}/interactions",
            get(interaction::list_for_lead).post(interaction::create_for_lead),
        )
}
