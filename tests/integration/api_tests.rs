//! API integration tests
//!
//! Need a running server on localhost:8080 and two accounts: a librarian
//! holding `catalog.can_mark_returned` and a plain reader. Credentials come
//! from LOCALLIB_STAFF_USER / LOCALLIB_STAFF_PASSWORD and
//! LOCALLIB_READER_USER / LOCALLIB_READER_PASSWORD.

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn credentials(role: &str, fallback: &str) -> (String, String) {
    let user = std::env::var(format!("LOCALLIB_{}_USER", role)).unwrap_or_else(|_| fallback.to_string());
    let password = std::env::var(format!("LOCALLIB_{}_PASSWORD", role)).unwrap_or_else(|_| fallback.to_string());
    (user, password)
}

/// Helper to get a bearer token for the given account
async fn get_auth_token(client: &Client, (username, password): (String, String)) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_counts_session_visits() {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let first: Value = client
        .get(format!("{}/dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let second: Value = client
        .get(format!("{}/dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(first["num_visits"], 1);
    assert_eq!(second["num_visits"], 2);
    assert!(second["num_instances_available"].as_i64().unwrap() <= second["num_instances"].as_i64().unwrap());
}

#[tokio::test]
#[ignore]
async fn test_list_books_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["per_page"], 10);
    assert!(body["items"].as_array().unwrap().len() <= 10);

    let past_end = client
        .get(format!("{}/books?page={}", BASE_URL, body["num_pages"].as_i64().unwrap() + 1))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(past_end.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_my_books_requires_login() {
    let client = Client::new();

    let response = client
        .get(format!("{}/mybooks", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_renewal_requires_capability() {
    let client = Client::new();
    let token = get_auth_token(&client, credentials("READER", "reader")).await;

    let response = client
        .get(format!("{}/bookinstances/{}/renew", BASE_URL, uuid::Uuid::new_v4()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_staff_renews_first_borrowed_copy() {
    let client = Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client");
    let token = get_auth_token(&client, credentials("STAFF", "librarian")).await;

    let borrowed: Value = client
        .get(format!("{}/borrowed", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let Some(copy) = borrowed["items"].as_array().and_then(|items| items.first()) else {
        return;
    };
    let renew_url = format!("{}/bookinstances/{}/renew", BASE_URL, copy["id"].as_str().unwrap());

    let form: Value = client
        .get(&renew_url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .post(&renew_url)
        .bearer_auth(&token)
        .json(&json!({ "renewal_date": form["renewal_date"] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/api/v1/books");
}
