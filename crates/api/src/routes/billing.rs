//! Route definitions for the `/charges` resource and nested payments.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/charges`.
///
/// ```text
/// GET  /                -> list
/// POST /                -> create
/// POST /mark-overdue    -> mark_overdue (admin only)
/// GET  /{id}            -> get_by_id
/// POST /{id}/cancel     -> cancel
/// GET  /{id}/payments   -> list_payments
/// POST /{id}/payments   -> record_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(billing::list).post(billing::create))
        .route("/mark-overdue", post(billing::mark_overdue))
        .route("/{id}", get(billing::get_by_id))
        .route("/{id}/cancel", post(billing::cancel))
        .route(
            "/{id}/payments",
            get(billing::list_payments).post(billing::record_payment),
        )
}
