//! Repository for the `charges` table.

use atrio_core::billing::{CHARGE_CANCELLED, CHARGE_OVERDUE, CHARGE_PENDING};
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use sqlx::PgPool;

use crate::models::charge::{Charge, ChargeQuery, CreateCharge};
use crate::repositories::filter::{self, BindValue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, contract_id, description, amount_cents, \
                        due_on, status, created_at, updated_at";

/// Provides CRUD and status-sweep operations for charges.
pub struct ChargeRepo;

impl ChargeRepo {
    /// Insert a new charge in status `pending`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCharge) -> Result<Charge, sqlx::Error> {
        let query = format!(
            "INSERT INTO charges (client_id, contract_id, description, amount_cents, due_on)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Charge>(&query)
            .bind(input.client_id)
            .bind(input.contract_id)
            .bind(&input.description)
            .bind(input.amount_cents)
            .bind(input.due_on)
            .fetch_one(pool)
            .await
    }

    /// Find a charge by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Charge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM charges WHERE id = $1");
        sqlx::query_as::<_, Charge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List charges matching the given filters, soonest due first.
    pub async fn list(pool: &PgPool, params: &ChargeQuery) -> Result<Vec<Charge>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let (where_clause, values, bind_idx) = build_charge_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM charges {where_clause} \
             ORDER BY due_on ASC, id ASC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = filter::bind_values(sqlx::query_as::<_, Charge>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count charges matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ChargeQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, values, _) = build_charge_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM charges {where_clause}");
        let q = filter::bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }

    /// Cancel a charge that is still `pending` or `overdue`.
    ///
    /// Returns the updated row, or `None` if the charge does not exist
    /// or is already settled.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<Charge>, sqlx::Error> {
        let query = format!(
            "UPDATE charges SET status = $2
             WHERE id = $1 AND status IN ($3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Charge>(&query)
            .bind(id)
            .bind(CHARGE_CANCELLED)
            .bind(CHARGE_PENDING)
            .bind(CHARGE_OVERDUE)
            .fetch_optional(pool)
            .await
    }

    /// Sweep `pending` charges past their due date into `overdue`.
    ///
    /// Returns the number of charges flipped.
    pub async fn mark_overdue(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE charges SET status = $1
             WHERE status = $2 AND due_on < CURRENT_DATE",
        )
        .bind(CHARGE_OVERDUE)
        .bind(CHARGE_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

/// Build a WHERE clause and bind values from `ChargeQuery` filter
/// parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_charge_filter(params: &ChargeQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut values: Vec<BindValue> = Vec::new();

    if let Some(client_id) = params.client_id {
        conditions.push(format!("client_id = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::BigInt(client_id));
    }

    if let Some(contract_id) = params.contract_id {
        conditions.push(format!("contract_id = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::BigInt(contract_id));
    }

    if let Some(ref status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Text(status.clone()));
    }

    if let Some(due_before) = params.due_before {
        conditions.push(format!("due_on <= ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Date(due_before));
    }

    (filter::where_clause(&conditions), values, bind_idx)
}
