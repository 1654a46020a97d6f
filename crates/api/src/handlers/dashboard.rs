//! Handlers for the `/dashboard` read-only rollups.
//!
//! All endpoints aggregate in SQL and require authentication only; the
//! numbers shown are the same for every role.

use atrio_core::pagination::clamp_limit;
use atrio_db::models::dashboard::{
    ActivityEntry, DashboardSummary, LeadFunnelEntry, MonthlyRevenueEntry,
};
use atrio_db::repositories::DashboardRepo;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of rows for the activity feed.
const DEFAULT_ACTIVITY_LIMIT: i64 = 20;
/// Upper bound for the activity feed.
const MAX_ACTIVITY_LIMIT: i64 = 100;

/// Query params for `GET /dashboard/revenue-monthly`.
#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// Calendar year to aggregate. Defaults to the current year.
    pub year: Option<i32>,
}

/// Query params for `GET /dashboard/activity`.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Maximum rows to return. Defaults to 20, capped at 100.
    pub limit: Option<i64>,
}

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let summary = DashboardRepo::summary(&state.pool).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/dashboard/lead-funnel
///
/// Lead counts per status, fullest bucket first.
pub async fn lead_funnel(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<LeadFunnelEntry>>>> {
    let funnel = DashboardRepo::lead_funnel(&state.pool).await?;
    Ok(Json(DataResponse { data: funnel }))
}

/// GET /api/v1/dashboard/revenue-monthly
///
/// Paid amounts per calendar month of one year. Months without payments
/// are absent from the result.
pub async fn revenue_monthly(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<RevenueQuery>,
) -> AppResult<Json<DataResponse<Vec<MonthlyRevenueEntry>>>> {
    let year = params.year.unwrap_or_else(|| Utc::now().year());
    let revenue = DashboardRepo::revenue_monthly(&state.pool, year).await?;
    Ok(Json(DataResponse { data: revenue }))
}

/// GET /api/v1/dashboard/activity
///
/// Most recent interactions with author username and subject name.
pub async fn activity(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<Vec<ActivityEntry>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT);
    let entries = DashboardRepo::recent_activity(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
