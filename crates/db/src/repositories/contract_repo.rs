//! Repository for the `contracts` table.

use atrio_core::billing::CONTRACT_SIGNED;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use sqlx::PgPool;

use crate::models::contract::{Contract, ContractQuery, CreateContract, UpdateContract};
use crate::repositories::filter::{self, BindValue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, title, description, value_cents, status, \
                        signed_at, starts_on, ends_on, created_at, updated_at";

/// Provides CRUD operations for contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a new contract in status `draft`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateContract) -> Result<Contract, sqlx::Error> {
        let query = format!(
            "INSERT INTO contracts (client_id, title, description, value_cents, starts_on, ends_on)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(input.client_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.value_cents)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .fetch_one(pool)
            .await
    }

    /// Find a contract by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contracts WHERE id = $1");
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List contracts matching the given filters, newest first.
    pub async fn list(pool: &PgPool, params: &ContractQuery) -> Result<Vec<Contract>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let (where_clause, values, bind_idx) = build_contract_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM contracts {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = filter::bind_values(sqlx::query_as::<_, Contract>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count contracts matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ContractQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, values, _) = build_contract_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM contracts {where_clause}");
        let q = filter::bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }

    /// Update a contract. Only non-`None` fields in `input` are applied;
    /// the status column is not touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContract,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                value_cents = COALESCE($4, value_cents),
                starts_on = COALESCE($5, starts_on),
                ends_on = COALESCE($6, ends_on)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.value_cents)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .fetch_optional(pool)
            .await
    }

    /// Write a new status, stamping `signed_at` on the transition into
    /// `signed`. Transition validity is checked by the caller.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Contract>, sqlx::Error> {
        let query = format!(
            "UPDATE contracts SET
                status = $2,
                signed_at = CASE WHEN $2 = $3 THEN NOW() ELSE signed_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contract>(&query)
            .bind(id)
            .bind(status)
            .bind(CONTRACT_SIGNED)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contract. Returns `true` if the row existed.
    ///
    /// Fails with a foreign-key violation while charges still reference
    /// the contract; callers surface that as a client error.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build a WHERE clause and bind values from `ContractQuery` filter
/// parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_contract_filter(params: &ContractQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut values: Vec<BindValue> = Vec::new();

    if let Some(client_id) = params.client_id {
        conditions.push(format!("client_id = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::BigInt(client_id));
    }

    if let Some(ref status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Text(status.clone()));
    }

    (filter::where_clause(&conditions), values, bind_idx)
}
