//! Repository for the `leads` table, including the conversion workflow.

use atrio_core::interaction::{SUBJECT_CLIENT, SUBJECT_LEAD};
use atrio_core::lead::{STATUS_CONVERTED, STATUS_NEW};
use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::Client;
use crate::models::lead::{
    ConvertLead, ConvertedLead, CreateLead, Lead, LeadConversion, LeadQuery, UpdateLead,
};
use crate::repositories::filter::{self, BindValue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, company, source, status, \
                        assigned_to, converted_client_id, notes, created_at, updated_at";

/// Column list for the client row created by a conversion.
const CLIENT_COLUMNS: &str = "id, name, email, phone, company, address, status, \
                               assigned_to, notes, created_at, updated_at";

/// Provides CRUD and conversion operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead in status `new`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, email, phone, company, source, status, assigned_to, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.source)
            .bind(STATUS_NEW)
            .bind(input.assigned_to)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List leads matching the given filters, newest first.
    pub async fn list(pool: &PgPool, params: &LeadQuery) -> Result<Vec<Lead>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        let (where_clause, values, bind_idx) = build_lead_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM leads {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = filter::bind_values(sqlx::query_as::<_, Lead>(&query), &values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count leads matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &LeadQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, values, _) = build_lead_filter(params);
        let query = format!("SELECT COUNT(*)::BIGINT FROM leads {where_clause}");
        let q = filter::bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &values);
        q.fetch_one(pool).await
    }

    /// Update a lead's editable fields. Only non-`None` fields are applied;
    /// the status column is not touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                source = COALESCE($6, source),
                assigned_to = COALESCE($7, assigned_to),
                notes = COALESCE($8, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.source)
            .bind(input.assigned_to)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Write a new status. Transition validity is checked by the caller
    /// against the lead's current status before calling this.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("UPDATE leads SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lead and its interactions in one transaction.
    ///
    /// Returns `true` if the lead existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM interactions WHERE subject_type = $1 AND subject_id = $2")
            .bind(SUBJECT_LEAD)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Convert a lead into a client inside a single transaction.
    ///
    /// The lead row is locked with `FOR UPDATE` first, so two concurrent
    /// conversion attempts serialize: the second one sees the status
    /// already `converted` and reports [`LeadConversion::AlreadyConverted`]
    /// without creating a second client. The steps are:
    ///
    /// 1. lock and load the lead (missing row reports `NotFound`)
    /// 2. guard against repeat conversion
    /// 3. insert the client, overrides falling back to the lead's fields
    /// 4. mark the lead `converted` and link the new client id
    /// 5. re-point the lead's interactions at the client
    pub async fn convert(
        pool: &PgPool,
        id: DbId,
        overrides: &ConvertLead,
    ) -> Result<LeadConversion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock_query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1 FOR UPDATE");
        let Some(lead) = sqlx::query_as::<_, Lead>(&lock_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(LeadConversion::NotFound);
        };

        if lead.status == STATUS_CONVERTED {
            return Ok(LeadConversion::AlreadyConverted);
        }

        let client_query = format!(
            "INSERT INTO clients (name, email, phone, company, address, assigned_to, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {CLIENT_COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&client_query)
            .bind(overrides.name.as_deref().unwrap_or(&lead.name))
            .bind(overrides.email.as_deref().or(lead.email.as_deref()))
            .bind(overrides.phone.as_deref().or(lead.phone.as_deref()))
            .bind(overrides.company.as_deref().or(lead.company.as_deref()))
            .bind(overrides.address.as_deref())
            .bind(overrides.assigned_to.or(lead.assigned_to))
            .bind(overrides.notes.as_deref().or(lead.notes.as_deref()))
            .fetch_one(&mut *tx)
            .await?;

        let update_query = format!(
            "UPDATE leads SET status = $2, converted_client_id = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let converted = sqlx::query_as::<_, Lead>(&update_query)
            .bind(id)
            .bind(STATUS_CONVERTED)
            .bind(client.id)
            .fetch_one(&mut *tx)
            .await?;

        let moved = sqlx::query(
            "UPDATE interactions SET subject_type = $3, subject_id = $4
             WHERE subject_type = $1 AND subject_id = $2",
        )
        .bind(SUBJECT_LEAD)
        .bind(id)
        .bind(SUBJECT_CLIENT)
        .bind(client.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(LeadConversion::Converted(Box::new(ConvertedLead {
            client,
            lead: converted,
            interactions_moved: moved,
        })))
    }
}

/// Build a WHERE clause and bind values from `LeadQuery` filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_lead_filter(params: &LeadQuery) -> (String, Vec<BindValue>, u32) {
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

    if let Some(ref source) = params.source {
        conditions.push(format!("source = ${bind_idx}"));
        bind_idx += 1;
        values.push(BindValue::Text(source.clone()));
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
