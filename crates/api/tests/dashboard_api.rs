//! HTTP-level integration tests for the dashboard aggregates.
//!
//! Seeds a small but realistic dataset through the public API and checks
//! the rollup numbers rather than individual rows.

mod common;

use atrio_core::roles::{ROLE_ADMIN, ROLE_AGENT};
use axum::http::StatusCode;
use axum::Router;
use chrono::{Datelike, Utc};
use common::{body_json, get_auth, post_json_auth, put_json_auth, seed_and_login};
use sqlx::PgPool;

async fn create_lead(app: Router, token: &str, name: &str) -> i64 {
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(app, "/api/v1/leads", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Convert a lead and return the new client's id.
async fn convert_lead(app: Router, token: &str, lead_id: i64) -> i64 {
    let response = post_json_auth(
        app,
        &format!("/api/v1/leads/{lead_id}/convert"),
        serde_json::json!({}),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["client"]["id"]
        .as_i64()
        .unwrap()
}

async fn create_charge(
    app: Router,
    token: &str,
    client_id: i64,
    amount_cents: i64,
    due_on: &str,
) -> i64 {
    let body = serde_json::json!({
        "client_id": client_id,
        "description": "Invoice",
        "amount_cents": amount_cents,
        "due_on": due_on,
    });
    let response = post_json_auth(app, "/api/v1/charges", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// The landing summary counts leads, clients, upcoming appointments and
/// the outstanding balance.
#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_reports_headline_numbers(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let admin = seed_and_login(&pool, app.clone(), "admin1", ROLE_ADMIN).await;

    // Three leads: one converted, one contacted, one untouched.
    let lead_a = create_lead(app.clone(), &agent, "Ana Torres").await;
    let lead_b = create_lead(app.clone(), &agent, "Ben Okafor").await;
    create_lead(app.clone(), &agent, "Carla Mendez").await;
    let client_id = convert_lead(app.clone(), &agent, lead_a).await;
    let body = serde_json::json!({ "status": "contacted" });
    put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{lead_b}/status"),
        body,
        &agent,
    )
    .await;

    // One upcoming appointment plus one cancelled (which must not count).
    let body = serde_json::json!({
        "title": "Kickoff",
        "starts_at": "2030-06-01T09:00:00Z",
        "duration_mins": 60,
    });
    post_json_auth(app.clone(), "/api/v1/appointments", body, &agent).await;
    let body = serde_json::json!({
        "title": "Old plan",
        "starts_at": "2030-06-02T09:00:00Z",
        "duration_mins": 60,
    });
    let response = post_json_auth(app.clone(), "/api/v1/appointments", body, &agent).await;
    let cancelled = body_json(response).await["data"]["id"].as_i64().unwrap();
    let body = serde_json::json!({ "status": "cancelled" });
    put_json_auth(
        app.clone(),
        &format!("/api/v1/appointments/{cancelled}/status"),
        body,
        &agent,
    )
    .await;

    // One pending charge and one past-due charge flipped by the sweep.
    create_charge(app.clone(), &agent, client_id, 50_000, "2030-07-01").await;
    create_charge(app.clone(), &agent, client_id, 30_000, "2020-01-01").await;
    post_json_auth(
        app.clone(),
        "/api/v1/charges/mark-overdue",
        serde_json::json!({}),
        &admin,
    )
    .await;

    let response = get_auth(app.clone(), "/api/v1/dashboard/summary", &agent).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];

    assert_eq!(data["leads_total"], 3);
    assert_eq!(data["leads_open"], 2, "converted lead leaves the pipeline");
    assert_eq!(data["clients_active"], 1);
    assert_eq!(data["appointments_upcoming"], 1);
    assert_eq!(data["outstanding_cents"], 80_000);
    assert_eq!(data["charges_overdue"], 1);

    // The dashboard is not public.
    let response = common::get(app, "/api/v1/dashboard/summary").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Funnel
// ---------------------------------------------------------------------------

/// The funnel buckets leads per status.
#[sqlx::test(migrations = "../../db/migrations")]
async fn lead_funnel_buckets_by_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;

    let lead_a = create_lead(app.clone(), &agent, "Ana Torres").await;
    let lead_b = create_lead(app.clone(), &agent, "Ben Okafor").await;
    create_lead(app.clone(), &agent, "Carla Mendez").await;
    convert_lead(app.clone(), &agent, lead_a).await;
    let body = serde_json::json!({ "status": "contacted" });
    put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{lead_b}/status"),
        body,
        &agent,
    )
    .await;

    let response = get_auth(app, "/api/v1/dashboard/lead-funnel", &agent).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let funnel = json["data"].as_array().unwrap().clone();

    let count_for = |status: &str| {
        funnel
            .iter()
            .find(|e| e["status"] == status)
            .map(|e| e["count"].as_i64().unwrap())
    };

    assert_eq!(funnel.len(), 3);
    assert_eq!(count_for("new"), Some(1));
    assert_eq!(count_for("contacted"), Some(1));
    assert_eq!(count_for("converted"), Some(1));
    assert_eq!(count_for("lost"), None, "empty buckets are absent");
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// Monthly revenue sums payments by `paid_at` month for the given year.
#[sqlx::test(migrations = "../../db/migrations")]
async fn revenue_monthly_sums_payments(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let lead = create_lead(app.clone(), &agent, "Ana Torres").await;
    let client_id = convert_lead(app.clone(), &agent, lead).await;
    let charge_id = create_charge(app.clone(), &agent, client_id, 100_000, "2029-03-01").await;

    // Two backdated payments in different months of 2029.
    let body = serde_json::json!({
        "amount_cents": 20_000,
        "method": "card",
        "paid_at": "2029-03-10T12:00:00Z",
    });
    let uri = format!("/api/v1/charges/{charge_id}/payments");
    let response = post_json_auth(app.clone(), &uri, body, &agent).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = serde_json::json!({
        "amount_cents": 15_000,
        "method": "cash",
        "paid_at": "2029-07-02T09:00:00Z",
    });
    let response = post_json_auth(app.clone(), &uri, body, &agent).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        app.clone(),
        "/api/v1/dashboard/revenue-monthly?year=2029",
        &agent,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let months = json["data"].as_array().unwrap();

    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["month"], 3);
    assert_eq!(months[0]["total_cents"], 20_000);
    assert_eq!(months[1]["month"], 7);
    assert_eq!(months[1]["total_cents"], 15_000);

    // A year with no payments yields an empty series.
    let response = get_auth(
        app.clone(),
        "/api/v1/dashboard/revenue-monthly?year=1999",
        &agent,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    // Omitting the year defaults to the current one.
    let body = serde_json::json!({ "amount_cents": 5_000, "method": "cash" });
    let response = post_json_auth(app.clone(), &uri, body, &agent).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, "/api/v1/dashboard/revenue-monthly", &agent).await;
    let json = body_json(response).await;
    let this_month = i64::from(Utc::now().month());
    let entry = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["month"] == this_month)
        .expect("current month present");
    assert_eq!(entry["total_cents"], 5_000);
}

// ---------------------------------------------------------------------------
// Activity feed
// ---------------------------------------------------------------------------

/// The activity feed labels interactions with subject and author names.
#[sqlx::test(migrations = "../../db/migrations")]
async fn activity_feed_labels_subjects_and_authors(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let agent = seed_and_login(&pool, app.clone(), "agent1", ROLE_AGENT).await;
    let lead = create_lead(app.clone(), &agent, "Ana Torres").await;
    let lead_keep = create_lead(app.clone(), &agent, "Ben Okafor").await;
    let client_id = convert_lead(app.clone(), &agent, lead).await;

    let body = serde_json::json!({ "kind": "call", "content": "Quoted the spring package" });
    post_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{lead_keep}/interactions"),
        body,
        &agent,
    )
    .await;
    let body = serde_json::json!({ "kind": "email", "content": "Sent onboarding docs" });
    post_json_auth(
        app.clone(),
        &format!("/api/v1/clients/{client_id}/interactions"),
        body,
        &agent,
    )
    .await;

    let response = get_auth(app.clone(), "/api/v1/dashboard/activity", &agent).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    // Newest first: the client email tops the feed.
    assert_eq!(entries[0]["subject_type"], "client");
    assert_eq!(entries[0]["subject_name"], "Ana Torres");
    assert_eq!(entries[0]["username"], "agent1");
    assert_eq!(entries[0]["kind"], "email");
    assert_eq!(entries[1]["subject_type"], "lead");
    assert_eq!(entries[1]["subject_name"], "Ben Okafor");

    // The limit parameter truncates the feed.
    let response = get_auth(app, "/api/v1/dashboard/activity?limit=1", &agent).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
