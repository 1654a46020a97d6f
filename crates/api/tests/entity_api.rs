//! HTTP-level integration tests for clients and contracts.
//!
//! Clients soft-delete (DELETE archives); contracts walk a lifecycle
//! table and refuse hard deletion while charges still reference them.

mod common;

use atrio_core::roles::{ROLE_AGENT, ROLE_MANAGER};
use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::Router;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_and_login};
use sqlx::PgPool;

/// Create a client through the API and return its id.
async fn create_client(app: Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
    });
    let response = post_json_auth(app, "/api/v1/clients", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("client id")
}

/// Create a contract for a client and return its id.
async fn create_contract(app: Router, token: &str, client_id: i64, value_cents: i64) -> i64 {
    let body = serde_json::json!({
        "client_id": client_id,
        "title": "Annual maintenance",
        "value_cents": value_cents,
    });
    let response = post_json_auth(app, "/api/v1/contracts", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("contract id")
}

async fn set_contract_status(app: Router, token: &str, id: i64, status: &str) -> Response<Body> {
    let body = serde_json::json!({ "status": status });
    put_json_auth(app, &format!("/api/v1/contracts/{id}/status"), body, token).await
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// New clients start active and are readable back.
#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_fetch_client(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    let id = create_client(app.clone(), &token, "Rivera Catering").await;

    let response = get_auth(app, &format!("/api/v1/clients/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Rivera Catering");
    assert_eq!(json["data"]["status"], "active");
}

/// Status filter, free-text search and pagination echo.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_clients_filters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let manager = seed_and_login(&pool, app.clone(), "mgr1", ROLE_MANAGER).await;

    create_client(app.clone(), &manager, "Rivera Catering").await;
    create_client(app.clone(), &manager, "Okafor Logistics").await;
    let archived = create_client(app.clone(), &manager, "Mendez Interiors").await;
    delete_auth(app.clone(), &format!("/api/v1/clients/{archived}"), &manager).await;

    let response = get_auth(app.clone(), "/api/v1/clients?status=active", &manager).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    let response = get_auth(app.clone(), "/api/v1/clients?status=archived", &manager).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "Mendez Interiors");

    let response = get_auth(app.clone(), "/api/v1/clients?q=logistics", &manager).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "Okafor Logistics");

    let response = get_auth(app.clone(), "/api/v1/clients?limit=1", &manager).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["limit"], 1);
    assert_eq!(json["total"], 3);

    let response = get_auth(app, "/api/v1/clients?status=dormant", &manager).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Updates may relabel the status but only to known values.
#[sqlx::test(migrations = "../../db/migrations")]
async fn update_client_validates_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_client(app.clone(), &token, "Rivera Catering").await;

    let body = serde_json::json!({ "status": "inactive", "notes": "paused over winter" });
    let response = put_json_auth(app.clone(), &format!("/api/v1/clients/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "inactive");
    assert_eq!(json["data"]["notes"], "paused over winter");

    let body = serde_json::json!({ "status": "hibernating" });
    let response = put_json_auth(app, &format!("/api/v1/clients/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// DELETE archives instead of removing, stays idempotent, and needs
/// manager rights.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_archives_the_client(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let manager = seed_and_login(&pool, app.clone(), "mgr1", ROLE_MANAGER).await;
    let id = create_client(app.clone(), &agent, "Rivera Catering").await;
    let uri = format!("/api/v1/clients/{id}");

    let response = delete_auth(app.clone(), &uri, &agent).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The row survives with status `archived`.
    let response = get_auth(app.clone(), &uri, &agent).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "archived");

    // Archiving again is a no-op, not an error.
    let response = delete_auth(app.clone(), &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, "/api/v1/clients/555555", &manager).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Interactions attach to clients exactly as they do to leads.
#[sqlx::test(migrations = "../../db/migrations")]
async fn client_interactions_log_and_list(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_client(app.clone(), &token, "Rivera Catering").await;

    let body = serde_json::json!({ "kind": "email", "content": "Sent the renewal quote" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/clients/{id}/interactions"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["subject_type"], "client");
    assert_eq!(json["data"]["subject_id"], id);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/clients/{id}/interactions"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["kind"], "email");

    let body = serde_json::json!({ "kind": "note", "content": "..." });
    let response = post_json_auth(app, "/api/v1/clients/99999/interactions", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// New contracts start in `draft` with the given value.
#[sqlx::test(migrations = "../../db/migrations")]
async fn create_contract_starts_in_draft(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let client_id = create_client(app.clone(), &token, "Rivera Catering").await;

    let body = serde_json::json!({
        "client_id": client_id,
        "title": "Annual maintenance",
        "value_cents": 240_000,
        "starts_on": "2030-07-01",
    });
    let response = post_json_auth(app, "/api/v1/contracts", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "draft");
    assert_eq!(json["data"]["value_cents"], 240_000);
    assert_eq!(json["data"]["starts_on"], "2030-07-01");
    assert!(json["data"]["signed_at"].is_null());
}

/// Negative contract values are rejected on create and update.
#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_contract_value_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let client_id = create_client(app.clone(), &token, "Rivera Catering").await;

    let body = serde_json::json!({
        "client_id": client_id,
        "title": "Annual maintenance",
        "value_cents": -1,
    });
    let response = post_json_auth(app.clone(), "/api/v1/contracts", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let id = create_contract(app.clone(), &token, client_id, 240_000).await;
    let body = serde_json::json!({ "value_cents": -500 });
    let response = put_json_auth(app, &format!("/api/v1/contracts/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A contract for a nonexistent client trips the foreign key and
/// surfaces as a conflict, not a 500.
#[sqlx::test(migrations = "../../db/migrations")]
async fn contract_for_missing_client_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    let body = serde_json::json!({
        "client_id": 987654,
        "title": "Annual maintenance",
        "value_cents": 240_000,
    });
    let response = post_json_auth(app, "/api/v1/contracts", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Walking the lifecycle stamps `signed_at` at the `signed` step and
/// enforces the transition table.
#[sqlx::test(migrations = "../../db/migrations")]
async fn contract_lifecycle_stamps_signed_at(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let client_id = create_client(app.clone(), &token, "Rivera Catering").await;
    let id = create_contract(app.clone(), &token, client_id, 240_000).await;

    // draft -> signed skips `sent` and is rejected.
    let response = set_contract_status(app.clone(), &token, id, "signed").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = set_contract_status(app.clone(), &token, id, "sent").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["signed_at"].is_null());

    let response = set_contract_status(app.clone(), &token, id, "signed").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["signed_at"].is_string(), "signed_at stamped");

    let response = set_contract_status(app.clone(), &token, id, "active").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = set_contract_status(app.clone(), &token, id, "completed").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Terminal.
    let response = set_contract_status(app, &token, id, "cancelled").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Contract listing filters by client and status.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_contracts_filters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let client_a = create_client(app.clone(), &token, "Rivera Catering").await;
    let client_b = create_client(app.clone(), &token, "Okafor Logistics").await;

    create_contract(app.clone(), &token, client_a, 100_000).await;
    create_contract(app.clone(), &token, client_a, 50_000).await;
    let sent = create_contract(app.clone(), &token, client_b, 75_000).await;
    set_contract_status(app.clone(), &token, sent, "sent").await;

    let uri = format!("/api/v1/contracts?client_id={client_a}");
    let response = get_auth(app.clone(), &uri, &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    let response = get_auth(app.clone(), "/api/v1/contracts?status=sent", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["id"], sent);

    let response = get_auth(app, "/api/v1/contracts?status=renewed", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Contracts with live charges cannot be deleted; once the charges are
/// gone the delete goes through. Manager rights required throughout.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_contract_blocked_by_charges(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let manager = seed_and_login(&pool, app.clone(), "mgr1", ROLE_MANAGER).await;
    let client_id = create_client(app.clone(), &agent, "Rivera Catering").await;
    let contract_id = create_contract(app.clone(), &agent, client_id, 240_000).await;

    let body = serde_json::json!({
        "client_id": client_id,
        "contract_id": contract_id,
        "description": "First installment",
        "amount_cents": 60_000,
        "due_on": "2030-07-01",
    });
    let response = post_json_auth(app.clone(), "/api/v1/charges", body, &agent).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let charge_id = json["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/contracts/{contract_id}");
    let response = delete_auth(app.clone(), &uri, &agent).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    // Remove the charge out-of-band; the contract is then deletable.
    sqlx::query("DELETE FROM charges WHERE id = $1")
        .bind(charge_id)
        .execute(&pool)
        .await
        .unwrap();

    let response = delete_auth(app.clone(), &uri, &manager).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &agent).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
