//! Route definitions for the `/dashboard` rollups.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET  /summary          -> summary
/// GET  /lead-funnel      -> lead_funnel
/// GET  /revenue-monthly  -> revenue_monthly (?year=)
/// GET  /activity         -> activity (?limit=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(dashboard::summary))
        .route("/lead-funnel", get(dashboard::lead_funnel))
        .route("/revenue-monthly", get(dashboard::revenue_monthly))
        .route("/activity", get(dashboard::activity))
}
