//! Habit endpoints.

use chrono::{DateTime, Utc};
use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};

use habitual_core::types::Frequency;
use habitual_service::{
    auth::require_user,
    habit::{
        entry::parse_entry_date,
        period::CalendarZone,
        service::{self, HabitForm, HabitProgress},
    },
};

use super::{
    HABITS_ROUTE_COMPONENT,
    extract::{json_body, path_id, query_params},
    response::{HabitResponse, MessageResponse},
};
use crate::{config::get_config_from_depot, db_handler::get_db_from_depot, error::AppResult};

#[derive(Debug, Default, Deserialize)]
struct ProgressQuery {
    date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    habit_id: uuid::Uuid,
    frequency: Frequency,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    total: i64,
    target: i32,
    completed: bool,
}

impl From<HabitProgress> for ProgressResponse {
    fn from(progress: HabitProgress) -> Self {
        Self {
            completed: progress.completed(),
            habit_id: progress.habit_id,
            frequency: progress.frequency,
            period_start: progress.period.start,
            period_end: progress.period.end,
            total: progress.total,
            target: progress.target,
        }
    }
}

/// ## Summary
/// GET /api/habits - Active habits of the caller with their recent entries
#[handler]
#[tracing::instrument(skip_all)]
async fn list_habits(depot: &mut Depot) -> AppResult<Json<Vec<HabitResponse>>> {
    let user = require_user(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let habits = service::list_habits(&mut conn, user.id).await?;

    Ok(Json(
        habits
            .into_iter()
            .map(|h| HabitResponse::with_entries(h.habit, h.entries))
            .collect(),
    ))
}

/// ## Summary
/// POST /api/habits - Creates a habit
///
/// The stored frequency is derived from the recurrence fields of the body.
#[handler]
#[tracing::instrument(skip_all)]
async fn create_habit(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<HabitResponse>> {
    let user = require_user(depot)?;
    let form: HabitForm = json_body(req).await?;
    let config = get_config_from_depot(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let habit =
        service::create_habit(&mut conn, user.id, &form, &config.habits.default_color).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(habit.into()))
}

/// ## Summary
/// PUT /api/habits/{id} - Edits a habit; its frequency stays as created
#[handler]
#[tracing::instrument(skip_all)]
async fn update_habit(req: &mut Request, depot: &mut Depot) -> AppResult<Json<HabitResponse>> {
    let user = require_user(depot)?;
    let habit_id = path_id(req, "id", "Habit")?;
    let form: HabitForm = json_body(req).await?;
    let config = get_config_from_depot(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let habit = service::update_habit(
        &mut conn,
        user.id,
        habit_id,
        &form,
        &config.habits.default_color,
    )
    .await?;

    Ok(Json(habit.into()))
}

/// ## Summary
/// DELETE /api/habits/{id} - Archives a habit
#[handler]
#[tracing::instrument(skip_all)]
async fn delete_habit(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageResponse>> {
    let user = require_user(depot)?;
    let habit_id = path_id(req, "id", "Habit")?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    service::archive_habit(&mut conn, user.id, habit_id).await?;

    Ok(Json(MessageResponse::new("Habit deleted successfully")))
}

/// ## Summary
/// GET /api/habits/{id}/progress - Completion over the period containing `?date=`
///
/// Without a date, today in the configured calendar zone is used.
#[handler]
#[tracing::instrument(skip_all)]
async fn habit_progress(req: &mut Request, depot: &mut Depot) -> AppResult<Json<ProgressResponse>> {
    let user = require_user(depot)?;
    let habit_id = path_id(req, "id", "Habit")?;
    let params: ProgressQuery = query_params(req)?;
    let config = get_config_from_depot(depot)?;

    let zone = CalendarZone::from_config(&config.habits)?;
    let date = match params.date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => parse_entry_date(raw, zone)?,
        None => zone.today(),
    };

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let progress = service::habit_progress(&mut conn, zone, user.id, habit_id, date).await?;

    Ok(Json(progress.into()))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(HABITS_ROUTE_COMPONENT)
        .get(list_habits)
        .post(create_habit)
        .push(
            Router::with_path("{id}")
                .put(update_habit)
                .delete(delete_habit)
                .push(Router::with_path("progress").get(habit_progress)),
        )
}
