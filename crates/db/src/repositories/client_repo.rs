//! Repository for the `clients` table.

use atrio_core::client::STATUS_ARCHIVED;
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientQuery, CreateClient, UpdateClient};
use crate::repositories::filter::{self, BindValue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, company, address, status, \
                        assigned_to, notes, created_at, updated_at";

/// Provides CRUD operations for clients. Clients are never hard-deleted;
/// removal archives them via status.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client in status `active`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, email, phone, company, address, assigned_to, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.address)
            .bind(input.assigned_to)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List clients matching the given filters, newest first.
    pub async fn list(pool: &PgPool, params: &ClientQuery) -> Result<Vec<Client>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let (where_clause, values, bind_idx) = build_client_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM clients {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = filter::bind_values(sqlx::query_as::<_, Client>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count clients matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &ClientQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, values, _) = build_client_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM clients {where_clause}");
        let q = filter::bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                address = COALESCE($6, address),
                status = COALESCE($7, status),
                assigned_to = COALESCE($8, assigned_to),
                notes = COALESCE($9, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.address)
            .bind(&input.status)
            .bind(input.assigned_to)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Archive a client. Returns `true` if the row was updated.
    pub async fn archive(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE clients SET status = $2 WHERE id = $1 AND status != $2")
            .bind(id)
            .bind(STATUS_ARCHIVED)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build a WHERE clause and bind values from `ClientQuery` filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_client_filter(params: &ClientQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut values: Vec<BindValue> = Vec::new();

    if let Some(ref status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Text(status.clone()));
    }

    if let Some(user_id) = params.assigned_to {
        conditions.push(format!("assigned_to = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::BigInt(user_id));
    }

    if let Some(ref q) = params.q {
        conditions.push(format!(
            "(name ILIKE ${bind_idx} OR email ILIKE ${bind_idx} OR company ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        values.push(BindValue::Text(format!("%{q}%")));
    }

    (filter::where_clause(&conditions), values, bind_idx)
}
