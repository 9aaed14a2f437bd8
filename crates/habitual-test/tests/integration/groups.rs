#![allow(unused_must_use)]
//! Groups, invitations and roles against a live database.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

struct GroupFixture {
    test_db: TestDb,
    service: salvo::Service,
    group_id: String,
    invite_code: String,
}

/// `owner@` owns "Climbers"; `alice@` and `bob@` joined it in that order.
async fn group_with_members() -> GroupFixture {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    for (name, email) in [
        ("Owner", "owner@example.com"),
        ("Alice", "alice@example.com"),
        ("Bob", "bob@example.com"),
        ("Mallory", "mallory@example.com"),
    ] {
        test_db.seed_user(name, email).await.expect("seed user");
    }
    let service = test_db.service();

    let group = TestRequest::post("/api/groups")
        .as_user("owner@example.com")
        .json(&json!({"name": "Climbers", "description": "Tuesdays"}))
        .send(&service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let group_id = group["id"].as_str().expect("id").to_string();
    let invite_code = group["inviteCode"].as_str().expect("invite code").to_string();

    for email in ["alice@example.com", "bob@example.com"] {
        TestRequest::post("/api/groups/join")
            .as_user(email)
            .json(&json!({"inviteCode": invite_code}))
            .send(&service)
            .await
            .assert_status(StatusCode::CREATED);
    }

    GroupFixture {
        test_db,
        service,
        group_id,
        invite_code,
    }
}

async fn member_id(fixture: &GroupFixture, email: &str) -> String {
    let group = TestRequest::get(&format!("/api/groups/{}", fixture.group_id))
        .as_user("owner@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    group["members"]
        .as_array()
        .expect("members")
        .iter()
        .find(|member| member["user"]["email"] == email)
        .and_then(|member| member["id"].as_str())
        .expect("member present")
        .to_string()
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn create_and_join() {
    let fixture = group_with_members().await;
    assert_eq!(fixture.invite_code.len(), 24);
    assert!(
        fixture
            .invite_code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );

    let group = TestRequest::get(&format!("/api/groups/{}", fixture.group_id))
        .as_user("alice@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(group["owner"]["email"], "owner@example.com");
    assert_eq!(group["members"][0]["user"]["email"], "alice@example.com");
    assert_eq!(group["members"][1]["role"], "member");

    TestRequest::get(&format!("/api/groups/{}", fixture.group_id))
        .as_user("mallory@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("You are not a member of this group");

    TestRequest::get(&format!("/api/groups/{}", uuid::Uuid::new_v4()))
        .as_user("alice@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Group not found");
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn join_rejections() {
    let fixture = group_with_members().await;

    for email in ["alice@example.com", "owner@example.com"] {
        TestRequest::post("/api/groups/join")
            .as_user(email)
            .json(&json!({"inviteCode": fixture.invite_code}))
            .send(&fixture.service)
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error("You are already a member of this group");
    }

    TestRequest::post("/api/groups/join")
        .as_user("mallory@example.com")
        .json(&json!({"inviteCode": "nope"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Invalid invite code");

    TestRequest::post("/api/groups/join")
        .as_user("mallory@example.com")
        .json(&json!({}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invite code is required");
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn leave_group() {
    let fixture = group_with_members().await;
    let leave = format!("/api/groups/{}/leave", fixture.group_id);

    TestRequest::delete(&leave)
        .as_user("owner@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::delete(&leave)
        .as_user("mallory@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("You are not a member of this group");

    let json = TestRequest::delete(&leave)
        .as_user("bob@example.com")
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(
        json,
        json!({"message": "Successfully left the group", "success": true})
    );
    assert_eq!(fixture.test_db.count("group_member").await.expect("count"), 1);
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn role_changes_follow_permissions() {
    let fixture = group_with_members().await;
    let alice = member_id(&fixture, "alice@example.com").await;
    let bob = member_id(&fixture, "bob@example.com").await;
    let role_path = |member: &str| {
        format!(
            "/api/groups/{}/members/{member}/role",
            fixture.group_id
        )
    };

    TestRequest::patch(&role_path(&alice))
        .as_user("bob@example.com")
        .json(&json!({"role": "admin"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error("Only owners and admins can change roles");

    let promoted = TestRequest::patch(&role_path(&alice))
        .as_user("owner@example.com")
        .json(&json!({"role": "Admin"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(promoted["member"]["role"], "admin");
    assert_eq!(promoted["message"], "Successfully updated role to admin");

    TestRequest::patch(&role_path(&bob))
        .as_user("alice@example.com")
        .json(&json!({"role": "owner"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Invalid role");

    TestRequest::patch(&role_path(&alice))
        .as_user("alice@example.com")
        .json(&json!({"role": "member"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Cannot demote yourself - at least one other admin must remain");

    TestRequest::patch(&role_path(&uuid::Uuid::new_v4().to_string()))
        .as_user("owner@example.com")
        .json(&json!({"role": "member"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Member not found");

    TestRequest::patch(&role_path(&bob))
        .as_user("alice@example.com")
        .json(&json!({"role": "admin"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::OK);

    TestRequest::patch(&role_path(&alice))
        .as_user("alice@example.com")
        .json(&json!({"role": "member"}))
        .send(&fixture.service)
        .await
        .assert_status(StatusCode::OK);
}
