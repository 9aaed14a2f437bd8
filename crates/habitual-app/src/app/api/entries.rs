//! Habit entry endpoints.

use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};

use habitual_service::{
    auth::require_user,
    habit::{
        entry::{self, EntryForm, EntryQuery},
        period::CalendarZone,
    },
};

use super::{
    HABIT_ENTRIES_ROUTE_COMPONENT,
    extract::{json_body, query_params},
    response::EntryResponse,
};
use crate::{config::get_config_from_depot, db_handler::get_db_from_depot, error::AppResult};

/// ## Summary
/// POST /api/habit-entries - Logs a completion, replacing the one for the same day
#[handler]
#[tracing::instrument(skip_all)]
async fn log_entry(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<EntryResponse>> {
    let user = require_user(depot)?;
    let form: EntryForm = json_body(req).await?;
    let config = get_config_from_depot(depot)?;
    let zone = CalendarZone::from_config(&config.habits)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let entry = entry::log_entry(&mut conn, zone, user.id, &form).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(entry.into()))
}

/// ## Summary
/// GET /api/habit-entries - The caller's entries, newest day first
///
/// `habitId` narrows to one habit; `startDate` and `endDate` only apply together.
#[handler]
#[tracing::instrument(skip_all)]
async fn list_entries(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<EntryResponse>>> {
    let user = require_user(depot)?;
    let params: EntryQuery = query_params(req)?;
    let config = get_config_from_depot(depot)?;
    let zone = CalendarZone::from_config(&config.habits)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let entries = entry::list_entries(&mut conn, zone, user.id, &params).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|(entry, habit)| EntryResponse::with_habit(entry, habit))
            .collect(),
    ))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(HABIT_ENTRIES_ROUTE_COMPONENT)
        .get(list_entries)
        .post(log_entry)
}
