//! Route definitions for the `/clients` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{client, interaction};
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update
/// DELETE /{id}               -> archive (manager/admin; no hard delete)
/// GET    /{id}/interactions  -> list_for_client
/// POST   /{id}/interactions  -> create_for_client
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(client::list).post(client::create))
        .route(
            "/{id}",
            get(client::get_by_id)
                .put(client::update)
                .delete(client::archive),
        )
        .route(
            "/{id}/interactions",
            get(interaction::list_for_client).post(interaction::create_for_client),
        )
}
