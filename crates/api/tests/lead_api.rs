//! HTTP-level integration tests for the lead pipeline.
//!
//! Covers CRUD, list filtering, the status transition table, and the
//! conversion workflow including its idempotency guarantees.

mod common;

use atrio_core::roles::{ROLE_AGENT, ROLE_MANAGER};
use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_and_login};
use sqlx::PgPool;

/// Create a lead through the API and return its id.
async fn create_lead(app: axum::Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "company": "Acme Landscaping",
        "source": "referral",
    });
    let response = post_json_auth(app, "/api/v1/leads", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("lead id")
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// New leads start in status `new` with no converted client.
#[sqlx::test(migrations = "../../db/migrations")]
async fn create_lead_defaults_to_new(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    let body = serde_json::json!({ "name": "Dana Fuentes" });
    let response = post_json_auth(app, "/api/v1/leads", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "new");
    assert!(json["data"]["converted_client_id"].is_null());
}

/// Creating a lead requires authentication.
#[sqlx::test(migrations = "../../db/migrations")]
async fn create_lead_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "Nobody" });
    let response = common::post_json(app, "/api/v1/leads", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// List filtering by status and free-text search, with pagination totals.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_leads_filters_and_paginates(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    for name in ["Ana Torres", "Ben Okafor", "Carla Mendez"] {
        create_lead(app.clone(), &token, name).await;
    }

    // All three are in status `new`.
    let response = get_auth(app.clone(), "/api/v1/leads?status=new", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    // Free-text search matches the name.
    let response = get_auth(app.clone(), "/api/v1/leads?q=okafor", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "Ben Okafor");

    // Pagination clamps and echoes limit/offset.
    let response = get_auth(app.clone(), "/api/v1/leads?limit=2&offset=1", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["offset"], 1);

    // Unknown status filter values are rejected, not silently empty.
    let response = get_auth(app, "/api/v1/leads?status=bogus", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Fetching a missing lead returns 404 with the NOT_FOUND code.
#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_lead_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    let response = get_auth(app, "/api/v1/leads/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

/// Plain updates change contact fields but can never touch the status,
/// even when a `status` key is smuggled into the body.
#[sqlx::test(migrations = "../../db/migrations")]
async fn update_lead_ignores_status_field(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    let body = serde_json::json!({ "company": "Fuentes & Co", "status": "won" });
    let response = put_json_auth(app, &format!("/api/v1/leads/{id}"), body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["company"], "Fuentes & Co");
    assert_eq!(json["data"]["status"], "new", "status must be unchanged");
}

// ---------------------------------------------------------------------------
// Status workflow
// ---------------------------------------------------------------------------

/// Valid transitions succeed; invalid ones are rejected with 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn status_transitions_follow_the_table(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    // new -> contacted is allowed.
    let body = serde_json::json!({ "status": "contacted" });
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/status"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "contacted");

    // contacted -> won skips the pipeline and is rejected.
    let body = serde_json::json!({ "status": "won" });
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/status"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    // Unknown statuses are rejected outright.
    let body = serde_json::json!({ "status": "simmering" });
    let response = put_json_auth(app, &format!("/api/v1/leads/{id}/status"), body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// `converted` is never accepted through the status endpoint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn status_endpoint_rejects_converted(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    let body = serde_json::json!({ "status": "converted" });
    let response = put_json_auth(app, &format!("/api/v1/leads/{id}/status"), body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Converting a lead creates a client carrying the lead's fields, marks
/// the lead converted, and links the two.
#[sqlx::test(migrations = "../../db/migrations")]
async fn convert_lead_creates_client(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/convert"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let client = &json["data"]["client"];
    let lead = &json["data"]["lead"];

    assert_eq!(client["name"], "Dana Fuentes");
    assert_eq!(client["email"], "dana.fuentes@example.com");
    assert_eq!(client["status"], "active");
    assert_eq!(lead["status"], "converted");
    assert_eq!(lead["converted_client_id"], client["id"]);

    // The client is visible through the clients endpoint.
    let client_id = client["id"].as_i64().unwrap();
    let response = get_auth(app, &format!("/api/v1/clients/{client_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Conversion accepts field overrides for the new client.
#[sqlx::test(migrations = "../../db/migrations")]
async fn convert_lead_applies_overrides(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    let body = serde_json::json!({
        "name": "Fuentes Holdings",
        "address": "12 Canal Street",
    });
    let response = post_json_auth(app, &format!("/api/v1/leads/{id}/convert"), body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["client"]["name"], "Fuentes Holdings");
    assert_eq!(json["data"]["client"]["address"], "12 Canal Street");
    // Non-overridden fields fall back to the lead.
    assert_eq!(
        json["data"]["client"]["email"],
        "dana.fuentes@example.com"
    );
}

/// Converting a missing lead returns 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn convert_missing_lead_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    let response = post_json_auth(
        app,
        "/api/v1/leads/424242/convert",
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A second conversion attempt returns 409 and creates no second client.
#[sqlx::test(migrations = "../../db/migrations")]
async fn convert_twice_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/convert"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/convert"),
        serde_json::json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    // Exactly one client row exists for the lead's name.
    let response = get_auth(app, "/api/v1/clients?q=fuentes", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Lead deletion is manager/admin territory; agents get 403.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_lead_requires_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent_token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let manager_token = seed_and_login(&pool, app.clone(), "mgr1", ROLE_MANAGER).await;
    let id = create_lead(app.clone(), &agent_token, "Dana Fuentes").await;

    let response = delete_auth(app.clone(), &format!("/api/v1/leads/{id}"), &agent_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/v1/leads/{id}"), &manager_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/leads/{id}"), &agent_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// Interactions are logged under the lead with the caller as author.
#[sqlx::test(migrations = "../../db/migrations")]
async fn log_and_list_lead_interactions(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let id = create_lead(app.clone(), &token, "Dana Fuentes").await;

    let body = serde_json::json!({ "kind": "call", "content": "Intro call, interested" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/interactions"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["subject_type"], "lead");
    assert_eq!(json["data"]["subject_id"], id);
    assert_eq!(json["data"]["kind"], "call");

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/interactions"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["content"], "Intro call, interested");

    // Unknown interaction kinds are rejected.
    let body = serde_json::json!({ "kind": "carrier-pigeon", "content": "..." });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/interactions"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Logging against a missing lead is a 404.
    let body = serde_json::json!({ "kind": "note", "content": "..." });
    let response = post_json_auth(app, "/api/v1/leads/31337/interactions", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting an interaction needs manager rights.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_interaction_requires_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent_token = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let manager_token = seed_and_login(&pool, app.clone(), "mgr1", ROLE_MANAGER).await;
    let id = create_lead(app.clone(), &agent_token, "Dana Fuentes").await;

    let body = serde_json::json!({ "kind": "note", "content": "wrong lead, please remove" });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{id}/interactions"),
        body,
        &agent_token,
    )
    .await;
    let json = body_json(response).await;
    let interaction_id = json["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/interactions/{interaction_id}");
    let response = delete_auth(app.clone(), &uri, &agent_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &manager_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &uri, &manager_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
