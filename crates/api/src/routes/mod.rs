pub mod admin;
pub mod appointment;
pub mod auth;
pub mod billing;
pub mod client;
pub mod contract;
pub mod dashboard;
pub mod health;
pub mod lead;

use axum::routing::delete;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout (requires auth)
///
/// /admin/users                       list, create (admin only)
/// /admin/users/{id}                  get, update, deactivate
/// /admin/users/{id}/reset-password   reset password
///
/// /leads                             list, create
/// /leads/{id}                        get, update, delete
/// /leads/{id}/status                 pipeline transition (PUT)
/// /leads/{id}/convert                promote to client (POST)
/// /leads/{id}/interactions           list, log
///
/// /clients                           list, create
/// /clients/{id}                      get, update, archive
/// /clients/{id}/interactions         list, log
///
/// /appointments                      list, create (conflict-checked)
/// /appointments/{id}                 get, update (conflict-checked), delete
/// /appointments/{id}/status          lifecycle transition (PUT)
///
/// /contracts                         list, create
/// /contracts/{id}                    get, update, delete
/// /contracts/{id}/status             lifecycle transition (PUT)
///
/// /charges                           list, create
/// /charges/mark-overdue              overdue sweep (POST, admin only)
/// /charges/{id}                      get
/// /charges/{id}/cancel               cancel (POST)
/// /charges/{id}/payments             list, record
///
/// /interactions/{id}                 delete (manager/admin)
///
/// /dashboard/summary                 headline counts (GET)
/// /dashboard/lead-funnel             leads per status (GET)
/// /dashboard/revenue-monthly         paid revenue per month (GET, ?year=)
/// /dashboard/activity                recent interactions (GET, ?limit=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // Admin routes (user management).
        .nest("/admin", admin::router())
        // CRM resources.
        .nest("/leads", lead::router())
        .nest("/clients", client::router())
        .nest("/appointments", appointment::router())
        // Billing.
        .nest("/contracts", contract::router())
        .nest("/charges", billing::router())
        // Interaction deletion is not subject-scoped.
        .route("/interactions/{id}", delete(handlers::interaction::delete))
        // Read-only rollups.
        .nest("/dashboard", dashboard::router())
}
