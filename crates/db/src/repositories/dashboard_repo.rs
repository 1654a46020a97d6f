//! Read-only aggregate queries behind the dashboard endpoints.

use atrio_core::billing::{CHARGE_OVERDUE, CHARGE_PENDING};
use atrio_core::client::STATUS_ACTIVE;
use atrio_core::interaction::SUBJECT_LEAD;
use atrio_core::lead::{STATUS_CONVERTED, STATUS_LOST, STATUS_WON};
use atrio_core::scheduling::BLOCKING_STATUSES;
use sqlx::PgPool;

use crate::models::dashboard::{
    ActivityEntry, DashboardSummary, LeadFunnelEntry, MonthlyRevenueEntry,
};

/// Provides the dashboard rollup queries. All status literals in the SQL
/// are rendered from compile-time constants, never from user input.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Headline numbers: lead and client counts, upcoming appointments,
    /// and the outstanding charge balance.
    pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
        let blocking = quoted_list(BLOCKING_STATUSES);
        let query = format!(
            "SELECT
                (SELECT COUNT(*) FROM leads),
                (SELECT COUNT(*) FROM leads
                  WHERE status NOT IN ('{STATUS_WON}', '{STATUS_LOST}', '{STATUS_CONVERTED}')),
                (SELECT COUNT(*) FROM clients WHERE status = '{STATUS_ACTIVE}'),
                (SELECT COUNT(*) FROM appointments
                  WHERE status IN ({blocking}) AND starts_at >= NOW()),
                (SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM charges
                  WHERE status IN ('{CHARGE_PENDING}', '{CHARGE_OVERDUE}')),
                (SELECT COUNT(*) FROM charges WHERE status = '{CHARGE_OVERDUE}')"
        );

        let row: (i64, i64, i64, i64, i64, i64) =
            sqlx::query_as(&query).fetch_one(pool).await?;

        Ok(DashboardSummary {
            leads_total: row.0,
            leads_open: row.1,
            clients_active: row.2,
            appointments_upcoming: row.3,
            outstanding_cents: row.4,
            charges_overdue: row.5,
        })
    }

    /// Lead counts per status, fullest bucket first.
    pub async fn lead_funnel(pool: &PgPool) -> Result<Vec<LeadFunnelEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeadFunnelEntry>(
            "SELECT status, COUNT(*)::BIGINT AS count
             FROM leads
             GROUP BY status
             ORDER BY count DESC, status ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Paid amounts summed per calendar month of the given year.
    ///
    /// Months without payments are absent from the result.
    pub async fn revenue_monthly(
        pool: &PgPool,
        year: i32,
    ) -> Result<Vec<MonthlyRevenueEntry>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyRevenueEntry>(
            "SELECT EXTRACT(MONTH FROM paid_at)::INT AS month,
                    SUM(amount_cents)::BIGINT AS total_cents
             FROM payments
             WHERE EXTRACT(YEAR FROM paid_at) = $1
             GROUP BY month
             ORDER BY month ASC",
        )
        .bind(year)
        .fetch_all(pool)
        .await
    }

    /// Most recent interactions joined with author and subject labels.
    pub async fn recent_activity(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT i.id, i.subject_type, i.subject_id,
                    COALESCE(CASE WHEN i.subject_type = '{SUBJECT_LEAD}'
                                  THEN l.name ELSE c.name END, '') AS subject_name,
                    u.username, i.kind, i.content, i.occurred_at
             FROM interactions i
             JOIN users u ON u.id = i.user_id
             LEFT JOIN leads l ON i.subject_type = '{SUBJECT_LEAD}' AND l.id = i.subject_id
             LEFT JOIN clients c ON i.subject_type != '{SUBJECT_LEAD}' AND c.id = i.subject_id
             ORDER BY i.occurred_at DESC, i.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

/// Render a status constant slice as a quoted SQL list.
fn quoted_list(statuses: &[&str]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
