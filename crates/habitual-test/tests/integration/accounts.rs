#![allow(unused_must_use)]
//! Registration, login, profile and account deletion against a live database.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn register_then_login() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = test_db.service();

    let registered = TestRequest::post("/api/auth/register")
        .json(&json!({"name": "Ada", "email": "Ada@Example.com", "password": "secret1"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(registered["email"], "ada@example.com");
    assert!(registered["userId"].is_string());

    let user = TestRequest::post("/api/auth/login")
        .json(&json!({"email": "ada@example.com", "password": "secret1"}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(user["id"], registered["userId"]);
    assert_eq!(user["name"], "Ada");

    TestRequest::post("/api/auth/login")
        .json(&json!({"email": "ada@example.com", "password": "wrong-password"}))
        .send(&service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Invalid email or password");
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn register_validates_input() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db
        .seed_user("Taken", "taken@example.com")
        .await
        .expect("seed user");
    let service = test_db.service();

    TestRequest::post("/api/auth/register")
        .json(&json!({"name": "Bo", "email": "bo@example.com"}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Name, email and password are required");

    TestRequest::post("/api/auth/register")
        .json(&json!({"name": "Bo", "email": "bo@example.com", "password": "12345"}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Password must be at least 6 characters long");

    TestRequest::post("/api/auth/register")
        .json(&json!({"name": "Bo", "email": "taken@example.com", "password": "123456"}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Email already registered");
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn protected_routes_require_credentials() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    let service = test_db.service();

    TestRequest::get("/api/profile")
        .send(&service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error("Authentication required");

    TestRequest::get("/api/habits")
        .basic_auth("ghost@example.com", "whatever")
        .send(&service)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn profile_round_trip() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db
        .seed_user("Cleo", "cleo@example.com")
        .await
        .expect("seed user");
    let service = test_db.service();

    let profile = TestRequest::put("/api/profile")
        .as_user("cleo@example.com")
        .json(&json!({"name": "  Cleo Q  "}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(profile["name"], "Cleo Q");
    assert_eq!(profile["activeHabitCount"], 0);

    TestRequest::put("/api/profile")
        .as_user("cleo@example.com")
        .json(&json!({"name": "   "}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Name is required");

    let me = TestRequest::get("/api/user/me")
        .as_user("cleo@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(me["name"], "Cleo Q");
    assert!(me.get("createdAt").is_none());
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn default_avatar_selection_is_validated() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db
        .seed_user("Dee", "dee@example.com")
        .await
        .expect("seed user");
    let service = test_db.service();

    TestRequest::post("/api/set-default-avatar")
        .as_user("dee@example.com")
        .json(&json!({"avatarUrl": 42}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Avatar URL is required");

    TestRequest::post("/api/set-default-avatar")
        .as_user("dee@example.com")
        .json(&json!({"avatarUrl": "/uploads/default_avatar/../secret.png"}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid default avatar URL");

    let json = TestRequest::post("/api/set-default-avatar")
        .as_user("dee@example.com")
        .json(&json!({"avatarUrl": "/uploads/default_avatar/cat.png"}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(json["user"]["avatar"], "/uploads/default_avatar/cat.png");
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn password_change_checks_current_password() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db
        .seed_user("Eve", "eve@example.com")
        .await
        .expect("seed user");
    let service = test_db.service();

    TestRequest::post("/api/auth/reset-password")
        .as_user("eve@example.com")
        .json(&json!({"currentPassword": "not it", "newPassword": "another one"}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Current password is incorrect");

    TestRequest::post("/api/auth/reset-password")
        .as_user("eve@example.com")
        .json(&json!({"currentPassword": TEST_PASSWORD, "newPassword": "another one"}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("Password updated successfully");

    TestRequest::get("/api/profile")
        .basic_auth("eve@example.com", "another one")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn delete_account_hands_over_owned_groups() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db.seed_user("Owner", "owner@example.com").await.expect("seed owner");
    let heir = test_db.seed_user("Heir", "heir@example.com").await.expect("seed heir");
    let service = test_db.service();

    let group = TestRequest::post("/api/groups")
        .as_user("owner@example.com")
        .json(&json!({"name": "Runners"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    TestRequest::post("/api/groups")
        .as_user("owner@example.com")
        .json(&json!({"name": "Solo"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);
    TestRequest::post("/api/groups/join")
        .as_user("heir@example.com")
        .json(&json!({"inviteCode": group["inviteCode"]}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED);

    TestRequest::delete("/api/auth/delete-account")
        .as_user("owner@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("Account deleted successfully");

    let groups = TestRequest::get("/api/groups")
        .as_user("heir@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(groups.as_array().map(Vec::len), Some(1));
    assert_eq!(groups[0]["ownerId"], heir.to_string());
    assert_eq!(groups[0]["members"], json!([]));

    assert_eq!(test_db.count("user").await.expect("count"), 1);
    assert_eq!(test_db.count("group").await.expect("count"), 1);
    assert_eq!(test_db.count("auth_user").await.expect("count"), 1);
}
