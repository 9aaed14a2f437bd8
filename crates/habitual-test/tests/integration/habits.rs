#![allow(unused_must_use)]
//! Habits, entries and progress against a live database.

use salvo::http::StatusCode;
use serde_json::json;

use super::helpers::*;

async fn create_habit(service: &salvo::Service, email: &str, body: serde_json::Value) -> serde_json::Value {
    TestRequest::post("/api/habits")
        .as_user(email)
        .json(&body)
        .send(service)
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn create_habit_normalizes_recurrence() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db.seed_user("Ann", "ann@example.com").await.expect("seed user");
    let service = test_db.service();

    let daily = create_habit(&service, "ann@example.com", json!({"name": "Water"})).await;
    assert_eq!(daily["frequency"], "daily");
    assert_eq!(daily["color"], "#3B82F6");
    assert_eq!(daily["target"], 1);

    let weekly = create_habit(
        &service,
        "ann@example.com",
        json!({"name": "Gym", "scheduleType": "weekly", "selectedDays": ["monday", "wednesday"], "target": "3"}),
    )
    .await;
    assert_eq!(weekly["frequency"], "weekly");
    assert_eq!(weekly["target"], 3);

    let every_day = create_habit(
        &service,
        "ann@example.com",
        json!({"name": "Walk", "scheduleType": "weekly", "selectedDays": [
            "sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday"
        ]}),
    )
    .await;
    assert_eq!(every_day["frequency"], "daily");

    let monthly = create_habit(
        &service,
        "ann@example.com",
        json!({"name": "Budget", "scheduleType": "custom", "customInterval": 1, "customUnit": "months"}),
    )
    .await;
    assert_eq!(monthly["frequency"], "monthly");

    let every_other_day = create_habit(
        &service,
        "ann@example.com",
        json!({"name": "Call home", "scheduleType": "custom", "customInterval": "2", "customUnit": "days"}),
    )
    .await;
    assert_eq!(every_other_day["frequency"], "weekly");

    TestRequest::post("/api/habits")
        .as_user("ann@example.com")
        .json(&json!({"name": "  "}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Habit name is required");
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn update_keeps_frequency_and_delete_archives() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db.seed_user("Ben", "ben@example.com").await.expect("seed user");
    test_db.seed_user("Cat", "cat@example.com").await.expect("seed user");
    let service = test_db.service();

    let habit = create_habit(
        &service,
        "ben@example.com",
        json!({"name": "Read", "frequency": "weekly", "scheduleType": "weekly", "selectedDays": ["friday"]}),
    )
    .await;
    let path = format!("/api/habits/{}", habit["id"].as_str().expect("id"));

    let updated = TestRequest::put(&path)
        .as_user("ben@example.com")
        .json(&json!({"name": "Read more", "scheduleType": "daily", "color": "#000000"}))
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["name"], "Read more");
    assert_eq!(updated["frequency"], "weekly");
    assert_eq!(updated["color"], "#000000");

    TestRequest::put(&path)
        .as_user("cat@example.com")
        .json(&json!({"name": "Mine now"}))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Habit not found");

    TestRequest::delete(&path)
        .as_user("ben@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .assert_body_contains("Habit deleted successfully");

    let listed = TestRequest::get("/api/habits")
        .as_user("ben@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed, json!([]));
    assert_eq!(test_db.count("habit").await.expect("count"), 1);

    TestRequest::delete(&path)
        .as_user("ben@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn entries_upsert_per_day_and_feed_progress() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db.seed_user("Dan", "dan@example.com").await.expect("seed user");
    let service = test_db.service();

    let habit = create_habit(
        &service,
        "dan@example.com",
        json!({"name": "Run", "target": 3, "scheduleType": "weekly", "selectedDays": ["monday"]}),
    )
    .await;
    let habit_id = habit["id"].as_str().expect("id").to_string();

    // 2024-03-10 is a Sunday, the first day of its week.
    for (date, value) in [("2024-03-10", 1), ("2024-03-12", 0), ("2024-03-12", 2), ("2024-03-17", 5)] {
        TestRequest::post("/api/habit-entries")
            .as_user("dan@example.com")
            .json(&json!({"habitId": habit_id, "date": date, "value": value}))
            .send(&service)
            .await
            .assert_status(StatusCode::CREATED);
    }
    assert_eq!(test_db.count("habit_entry").await.expect("count"), 3);

    let progress = TestRequest::get(&format!("/api/habits/{habit_id}/progress?date=2024-03-16"))
        .as_user("dan@example.com")
        .send(&service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(progress["frequency"], "weekly");
    assert_eq!(progress["periodStart"], "2024-03-10T00:00:00Z");
    assert_eq!(progress["periodEnd"], "2024-03-16T23:59:59.999Z");
    assert_eq!(progress["total"], 3);
    assert_eq!(progress["completed"], true);

    let entries = TestRequest::get(&format!(
        "/api/habit-entries?habitId={habit_id}&startDate=2024-03-11&endDate=2024-03-17"
    ))
    .as_user("dan@example.com")
    .send(&service)
    .await
    .assert_status(StatusCode::OK)
    .json();
    let dates: Vec<_> = entries
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| entry["date"].clone())
        .collect();
    assert_eq!(dates, vec![json!("2024-03-17"), json!("2024-03-12")]);
    assert_eq!(entries[1]["value"], 2);
    assert_eq!(entries[0]["habit"]["name"], "Run");

    let listed = TestRequest::get("/api/habits")
        .as_user("dan@example.com")
        .send(&service)
        .await
        .json();
    assert_eq!(listed[0]["habitEntries"].as_array().map(Vec::len), Some(3));
}

#[test_log::test(tokio::test)]
#[ignore = "requires PostgreSQL"]
async fn entry_validation() {
    let test_db = TestDb::new().await.expect("Failed to create test database");
    test_db.seed_user("Fay", "fay@example.com").await.expect("seed user");
    let service = test_db.service();

    TestRequest::post("/api/habit-entries")
        .as_user("fay@example.com")
        .json(&json!({"date": "2024-01-01"}))
        .send(&service)
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error("Habit ID and date are required");

    TestRequest::post("/api/habit-entries")
        .as_user("fay@example.com")
        .json(&json!({"habitId": uuid::Uuid::new_v4(), "date": "2024-01-01"}))
        .send(&service)
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error("Habit not found");
}
