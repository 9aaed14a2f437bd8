#![allow(unused_must_use)]
//! Requests that are answered without touching the database.

use salvo::http::StatusCode;
use serde_json::json;

use habitual_test::component::config::AvatarsConfig;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn healthcheck_answers_ok() {
    let service = create_test_service(test_config());

    let response = TestRequest::get("/api/healthcheck")
        .send(&service)
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(response.body_string(), "OK");
}

#[test_log::test(tokio::test)]
async fn default_avatars_lists_images_sorted() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["sun.PNG", "moon.jpg", "notes.txt", "cloud.webp"] {
        std::fs::write(dir.path().join(name), b"x").expect("write avatar");
    }

    let mut settings = test_config();
    settings.avatars = AvatarsConfig {
        default_dir: dir.path().to_string_lossy().into_owned(),
        url_prefix: "/uploads/default_avatar/".to_string(),
    };
    let service = create_test_service(settings);

    let json = TestRequest::get("/api/default-avatars")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(
        json,
        json!({
            "avatars": [
                {"id": "cloud", "filename": "cloud.webp", "url": "/uploads/default_avatar/cloud.webp"},
                {"id": "moon", "filename": "moon.jpg", "url": "/uploads/default_avatar/moon.jpg"},
                {"id": "sun", "filename": "sun.PNG", "url": "/uploads/default_avatar/sun.PNG"},
            ]
        })
    );
}

#[test_log::test(tokio::test)]
async fn default_avatars_reports_unreadable_directory() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut settings = test_config();
    settings.avatars.default_dir = dir.path().join("missing").to_string_lossy().into_owned();
    let service = create_test_service(settings);

    TestRequest::get("/api/default-avatars")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error("Failed to load default avatars");
}

#[test_log::test(tokio::test)]
async fn register_rejects_malformed_body() {
    let service = create_test_service(test_config());

    TestRequest::post("/api/auth/register")
        .raw_json("{not json")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid request body");
}

#[test_log::test(tokio::test)]
async fn login_rejects_malformed_body() {
    let service = create_test_service(test_config());

    TestRequest::post("/api/auth/login")
        .raw_json("[]")
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn protected_routes_fail_without_database() {
    let service = create_test_service(test_config());

    TestRequest::get("/api/habits")
        .basic_auth("someone@example.com", "secret")
        .send(&service)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error("Internal server error");
}

#[test_log::test(tokio::test)]
async fn unknown_routes_are_not_found() {
    let service = create_test_service(test_config());

    let response = TestRequest::get("/api/nothing-here").send(&service).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let json = json!({"name": "Read"});
    let response = TestRequest::post("/habits").json(&json).send(&service).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
