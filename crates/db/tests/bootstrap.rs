use chrono::Duration;
use sqlx::PgPool;

use atrio_db::models::client::CreateClient;
use atrio_db::repositories::ClientRepo;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    atrio_db::health_check(&pool).await.unwrap();

    // Verify every entity table exists and starts empty.
    let tables = [
        "users",
        "user_sessions",
        "clients",
        "leads",
        "appointments",
        "contracts",
        "charges",
        "payments",
        "interactions",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty, got {} rows", count.0);
    }
}

/// The shared `set_updated_at` trigger stamps `updated_at` on every UPDATE,
/// even one that tries to write the column itself.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger_fires(pool: PgPool) {
    let client = ClientRepo::create(
        &pool,
        &CreateClient {
            name: "Ana Torres".to_string(),
            email: None,
            phone: None,
            company: None,
            address: None,
            assigned_to: None,
            notes: None,
        },
    )
    .await
    .unwrap();

    // Try to backdate; the trigger must override with NOW().
    sqlx::query("UPDATE clients SET updated_at = '2000-01-01T00:00:00Z' WHERE id = $1")
        .bind(client.id)
        .execute(&pool)
        .await
        .unwrap();

    let row = ClientRepo::find_by_id(&pool, client.id).await.unwrap().unwrap();
    assert!(
        row.updated_at >= client.created_at - Duration::minutes(1),
        "trigger should have overridden the backdated value, got {}",
        row.updated_at
    );
}
