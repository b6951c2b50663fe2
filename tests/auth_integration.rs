mod common;

use std::time::Duration;

use common::spawn_app;
use serde_json::Value;

async fn get_me(address: &str, token: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(&format!("{}/api/me", address))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request.")
}

async fn post(address: &str, path: &str, token: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(&format!("{}{}", address, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request.")
}

// --- Authentication ---

#[tokio::test]
async fn me_returns_401_without_token() {
    let app = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/api/me", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "MISSING_TOKEN");
}

#[tokio::test]
async fn me_returns_401_for_tampered_token() {
    let app = spawn_app();
    let token = format!("{}X", app.token_for("user-42", "member"));

    let response = get_me(&app.address, &token).await;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn me_returns_claims_for_valid_token() {
    let app = spawn_app();
    let token = app.token_for("user-42", "member");

    let response = get_me(&app.address, &token).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user_id"], "user-42");
    assert_eq!(body["role"], "member");
}

// --- Logout (single token) ---

#[tokio::test]
async fn logout_revokes_only_the_presented_token() {
    let app = spawn_app();
    let laptop = app.token_for("user-42", "member");
    let phone = app.token_for("user-42", "member");

    let response = post(&app.address, "/api/auth/logout", &laptop).await;
    assert_eq!(204, response.status().as_u16());

    let response = get_me(&app.address, &laptop).await;
    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "TOKEN_REVOKED");

    assert_eq!(200, get_me(&app.address, &phone).await.status().as_u16());
    assert_eq!(app.registry.size(), 1);
}

// --- Logout everywhere ---

#[tokio::test]
async fn logout_all_revokes_every_earlier_token() {
    let app = spawn_app();
    let laptop = app.token_for("user-42", "member");
    let phone = app.token_for("user-42", "member");
    let other_user = app.token_for("user-7", "member");
    tokio::time::sleep(Duration::from_millis(5)).await;

    let response = post(&app.address, "/api/auth/logout-all", &phone).await;
    assert_eq!(204, response.status().as_u16());

    assert_eq!(401, get_me(&app.address, &laptop).await.status().as_u16());
    assert_eq!(401, get_me(&app.address, &phone).await.status().as_u16());
    assert_eq!(200, get_me(&app.address, &other_user).await.status().as_u16());

    tokio::time::sleep(Duration::from_millis(5)).await;
    let fresh = app.token_for("user-42", "member");
    assert_eq!(200, get_me(&app.address, &fresh).await.status().as_u16());
}

// --- Admin ---

#[tokio::test]
async fn admin_can_force_logout_a_user() {
    let app = spawn_app();
    let admin = app.token_for("admin-1", "admin");
    let victim = app.token_for("user-42", "member");
    tokio::time::sleep(Duration::from_millis(5)).await;

    let response = post(&app.address, "/api/admin/users/user-42/revoke", &admin).await;
    assert_eq!(204, response.status().as_u16());

    assert_eq!(401, get_me(&app.address, &victim).await.status().as_u16());
    assert_eq!(200, get_me(&app.address, &admin).await.status().as_u16());
}

#[tokio::test]
async fn member_cannot_force_logout_others() {
    let app = spawn_app();
    let member = app.token_for("user-7", "member");
    let victim = app.token_for("user-42", "member");

    let response = post(&app.address, "/api/admin/users/user-42/revoke", &member).await;
    assert_eq!(403, response.status().as_u16());

    assert_eq!(200, get_me(&app.address, &victim).await.status().as_u16());
}

#[tokio::test]
async fn admin_sees_revocation_stats() {
    let app = spawn_app();
    let admin = app.token_for("admin-1", "admin");
    let member = app.token_for("user-42", "member");
    post(&app.address, "/api/auth/logout", &member).await;
    app.registry.revoke_all("user-9");

    let response = reqwest::Client::new()
        .get(&format!("{}/api/admin/revocations/stats", &app.address))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["denied_tokens"], 1);
    assert_eq!(body["revocation_marks"], 1);
    assert_eq!(body["faults"]["is_denied"], 0);
}
