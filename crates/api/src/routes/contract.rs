//! Route definitions for the `/contracts` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /             -> list
/// POST   /             -> create
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete (manager/admin; 409 while charges exist)
/// PUT    /{id}/status  -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contract::list).post(contract::create))
        .route(
            "/{id}",
            get(contract::get_by_id)
                .put(contract::update)
                .delete(contract::delete),
        )
        .route("/{id}/status", put(contract::update_status))
}
