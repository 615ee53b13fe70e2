//! API integration tests
//!
//! Expect a running server (`cargo run`) on localhost:8080 with a database
//! seeded by scripts/seed.sql. Each mutating test works on its own far-future
//! dates and cleans up after itself so the suite can run repeatedly.

use chrono::{Days, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use arvenna_server::models::OwnerClaims;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Venue created by scripts/seed.sql, open every day 09:00-18:00
const DEMO_VENUE: &str = "11111111-1111-1111-1111-111111111111";
/// Owner of the demo venue
const DEMO_OWNER: &str = "22222222-2222-2222-2222-222222222222";

/// Mint an owner token the way the platform auth service does
fn owner_token(owner_id: Uuid) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now().timestamp();
    let claims = OwnerClaims {
        sub: "owner@arvenna.app".to_string(),
        owner_id,
        exp: now + 3600,
        iat: now,
    };
    claims.create_token(&secret).expect("Failed to create token")
}

fn demo_token() -> String {
    owner_token(DEMO_OWNER.parse().expect("Invalid demo owner id"))
}

/// A date `days_ahead` from today, formatted for the API. Mutating tests use
/// disjoint offsets so parallel tests never touch the same date.
fn probe_date(days_ahead: u64) -> String {
    Utc::now()
        .date_naive()
        .checked_add_days(Days::new(days_ahead))
        .expect("Date out of range")
        .format("%Y-%m-%d")
        .to_string()
}

/// Reset every blockout on the given date so a test starts from a known state
async fn clear_day(client: &Client, token: &str, date: &str) {
    let response = client
        .post(format!("{}/venues/{}/blockouts/clear-day", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "date": date }))
        .send()
        .await
        .expect("Failed to send clear-day request");
    assert!(response.status().is_success());
}

/// Fetch the grid entry for a single date
async fn day_status(client: &Client, date: &str) -> Value {
    let response = client
        .get(format!(
            "{}/venues/{}/availability?start_date={}&end_date={}",
            BASE_URL, DEMO_VENUE, date, date
        ))
        .send()
        .await
        .expect("Failed to send availability request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let days = body.as_array().expect("Grid is not an array");
    assert_eq!(days.len(), 1);
    days[0].clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_availability_default_window() {
    let client = Client::new();

    let response = client
        .get(format!("{}/venues/{}/availability", BASE_URL, DEMO_VENUE))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let days = body.as_array().expect("Grid is not an array");
    // default window_days = 30, inclusive of both ends
    assert_eq!(days.len(), 31);
    assert_eq!(days[0]["date"].as_str().expect("No date"), probe_date(0));
    assert!(days[0]["status"].is_string());
    assert!(days[0]["slots_available"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_availability_unknown_venue() {
    let client = Client::new();

    let response = client
        .get(format!("{}/venues/{}/availability", BASE_URL, Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_day_slots() {
    let client = Client::new();
    let date = probe_date(55);

    let response = client
        .get(format!(
            "{}/venues/{}/availability/{}/slots",
            BASE_URL, DEMO_VENUE, date
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let slots = body.as_array().expect("Slots is not an array");
    // 09:00-18:00 gives nine one-hour slots
    assert_eq!(slots.len(), 9);
    assert_eq!(
        slots[0]["slot"].as_str().expect("No slot key"),
        format!("{}T09:00", date)
    );
    assert!(slots[0]["is_blocked"].is_boolean());
}

#[tokio::test]
#[ignore]
async fn test_day_slots_invalid_date() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/venues/{}/availability/not-a-date/slots",
            BASE_URL, DEMO_VENUE
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_block_and_unblock_dates() {
    let client = Client::new();
    let token = demo_token();
    let first = probe_date(60);
    let second = probe_date(61);
    clear_day(&client, &token, &first).await;
    clear_day(&client, &token, &second).await;

    // Block both dates
    let response = client
        .post(format!("{}/venues/{}/blockouts/block", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "dates": [first, second],
            "reason": "Renovation",
            "block_type": "maintenance"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["requested"], 2);
    assert_eq!(body["applied"], 2);
    assert_eq!(body["severity"], "success");

    let day = day_status(&client, &first).await;
    assert_eq!(day["status"], "blocked");
    assert_eq!(day["blockouts"][0]["reason"], "Renovation");

    // Unblock them again
    let response = client
        .post(format!("{}/venues/{}/blockouts/unblock", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "dates": [first, second] }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["applied"], 2);

    let day = day_status(&client, &first).await;
    assert_eq!(day["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_block_twice_is_idempotent() {
    let client = Client::new();
    let token = demo_token();
    let date = probe_date(65);
    clear_day(&client, &token, &date).await;

    let payload = json!({ "dates": [date] });
    let response = client
        .post(format!("{}/venues/{}/blockouts/block", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Same request again: nothing to apply, reported as informational
    let response = client
        .post(format!("{}/venues/{}/blockouts/block", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["applied"], 0);
    assert_eq!(body["skipped"], 1);
    assert_eq!(body["severity"], "info");

    clear_day(&client, &token, &date).await;
}

#[tokio::test]
#[ignore]
async fn test_toggle_flips_dates() {
    let client = Client::new();
    let token = demo_token();
    let date = probe_date(70);
    clear_day(&client, &token, &date).await;

    let payload = json!({ "dates": [date] });
    let response = client
        .post(format!("{}/venues/{}/blockouts/toggle", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "1 date(s) blocked, 0 date(s) unblocked");
    assert_eq!(day_status(&client, &date).await["status"], "blocked");

    let response = client
        .post(format!("{}/venues/{}/blockouts/toggle", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "0 date(s) blocked, 1 date(s) unblocked");
    assert_eq!(day_status(&client, &date).await["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_block_hours_then_clear_day() {
    let client = Client::new();
    let token = demo_token();
    let date = probe_date(75);
    clear_day(&client, &token, &date).await;

    let response = client
        .post(format!("{}/venues/{}/blockouts/block-hours", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "slots": [format!("{}T10:00", date), format!("{}T14:00", date)]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["applied"], 2);

    let day = day_status(&client, &date).await;
    assert_eq!(day["status"], "partial");
    assert_eq!(day["slots_available"], 7);

    // Clear-day removes hour records too
    let response = client
        .post(format!("{}/venues/{}/blockouts/clear-day", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "date": date }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["applied"], 2);
    assert_eq!(day_status(&client, &date).await["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_unblock_hours_requires_slots() {
    let client = Client::new();
    let token = demo_token();

    let response = client
        .post(format!("{}/venues/{}/blockouts/unblock-hours", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "date": probe_date(80), "slots": [] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_block_requires_dates() {
    let client = Client::new();
    let token = demo_token();

    let response = client
        .post(format!("{}/venues/{}/blockouts/block", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "dates": [] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_list_blockouts() {
    let client = Client::new();
    let token = demo_token();

    let response = client
        .get(format!("{}/venues/{}/blockouts", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .post(format!("{}/venues/{}/blockouts/block", BASE_URL, DEMO_VENUE))
        .json(&json!({ "dates": [probe_date(85)] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_foreign_owner_is_forbidden() {
    let client = Client::new();
    let token = owner_token(Uuid::new_v4());

    let response = client
        .post(format!("{}/venues/{}/blockouts/block", BASE_URL, DEMO_VENUE))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "dates": [probe_date(86)] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
