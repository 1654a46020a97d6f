//! Route definitions for the `/appointments` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::appointment;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create (409 on calendar conflict)
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update (409 on calendar conflict)
/// DELETE /{id}         -> delete (manager/admin)
/// PUT    /{id}/status  -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(appointment::list).post(appointment::create))
        .route(
            "/{id}",
            get(appointment::get_by_id)
                .put(appointment::update)
                .delete(appointment::delete),
        )
        .route("/{id}/status", put(appointment::update_status))
}
