//! Repository for the `interactions` table.

use atrio_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atrio_core::types::DbId;
use sqlx::PgPool;

use crate::models::interaction::{CreateInteraction, Interaction};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_type, subject_id, user_id, kind, content, \
                        occurred_at, created_at, updated_at";

/// Provides CRUD operations for interactions.
pub struct InteractionRepo;

impl InteractionRepo {
    /// Log an interaction against a subject, returning the created row.
    pub async fn create(
        pool: &PgPool,
        subject_type: &str,
        subject_id: DbId,
        user_id: DbId,
        input: &CreateInteraction,
    ) -> Result<Interaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO interactions (subject_type, subject_id, user_id, kind, content, occurred_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Interaction>(&query)
            .bind(subject_type)
            .bind(subject_id)
            .bind(user_id)
            .bind(&input.kind)
            .bind(&input.content)
            .bind(input.occurred_at)
            .fetch_one(pool)
            .await
    }

    /// Find an interaction by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Interaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM interactions WHERE id = $1");
        sqlx::query_as::<_, Interaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a subject's interactions, most recent first.
    pub async fn list_for_subject(
        pool: &PgPool,
        subject_type: &str,
        subject_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Interaction>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM interactions
             WHERE subject_type = $1 AND subject_id = $2
             ORDER BY occurred_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Interaction>(&query)
            .bind(subject_type)
            .bind(subject_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a subject's interactions (for pagination metadata).
    pub async fn count_for_subject(
        pool: &PgPool,
        subject_type: &str,
        subject_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM interactions WHERE subject_type = $1 AND subject_id = $2",
        )
        .bind(subject_type)
        .bind(subject_id)
        .fetch_one(pool)
        .await
    }

    /// Delete an interaction. Returns `true` if the row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM interactions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
