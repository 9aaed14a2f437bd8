//! Logging and listing habit completions.

use chrono::{DateTime, NaiveDate};
use diesel_async::AsyncPgConnection;
use serde::Deserialize;

use habitual_db::{
    db::query::{self, entry::EntryFilter},
    model::habit::{
        Habit,
        entry::{HabitEntry, NewHabitEntry},
    },
};

use super::period::CalendarZone;
use crate::error::{ServiceError, ServiceResult};

/// Body of a log-entry request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    pub habit_id: Option<uuid::Uuid>,
    pub date: Option<String>,
    pub value: Option<i32>,
    pub notes: Option<String>,
}

/// Query string of the list-entries request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryQuery {
    pub habit_id: Option<uuid::Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// ## Summary
/// Parses `YYYY-MM-DD`, or an RFC 3339 instant taken as its calendar date in `zone`.
///
/// ## Errors
/// Returns a `ValidationError` for anything else.
pub fn parse_entry_date(raw: &str, zone: CalendarZone) -> ServiceResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| zone.date_of(&instant))
        .map_err(|_e| ServiceError::validation(format!("Invalid date: {raw}")))
}

/// ## Summary
/// Records a completion for a day, replacing an earlier one for the same day.
///
/// ## Errors
/// Returns a `ValidationError` for missing fields or a bad date and `NotFound`
/// when the habit does not belong to the user.
#[tracing::instrument(skip(conn, form), fields(user_id = %user_id))]
pub async fn log_entry(
    conn: &mut AsyncPgConnection,
    zone: CalendarZone,
    user_id: uuid::Uuid,
    form: &EntryForm,
) -> ServiceResult<HabitEntry> {
    let (Some(habit_id), Some(raw_date)) = (form.habit_id, form.date.as_deref()) else {
        return Err(ServiceError::validation("Habit ID and date are required"));
    };
    let entry_date = parse_entry_date(raw_date, zone)?;

    let habit = query::habit::find_owned(conn, user_id, habit_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Habit not found"))?;

    let entry = query::entry::upsert_entry(
        conn,
        &NewHabitEntry {
            user_id,
            habit_id: habit.id,
            entry_date,
            value: form.value.filter(|value| *value != 0).unwrap_or(1),
            notes: form.notes.as_deref(),
        },
    )
    .await?;

    tracing::debug!(habit_id = %habit.id, %entry_date, value = entry.value, "Entry recorded");

    Ok(entry)
}

/// ## Summary
/// Lists the user's entries with their habits, newest day first.
///
/// The date range applies only when both bounds are given.
///
/// ## Errors
/// Returns a `ValidationError` for an unparsable bound, or a database error.
#[tracing::instrument(skip(conn, params), fields(user_id = %user_id))]
pub async fn list_entries(
    conn: &mut AsyncPgConnection,
    zone: CalendarZone,
    user_id: uuid::Uuid,
    params: &EntryQuery,
) -> ServiceResult<Vec<(HabitEntry, Habit)>> {
    let filter = entry_filter(zone, params)?;
    Ok(query::entry::list_for_user(conn, user_id, filter).await?)
}

fn entry_filter(zone: CalendarZone, params: &EntryQuery) -> ServiceResult<EntryFilter> {
    let dates = match (params.start_date.as_deref(), params.end_date.as_deref()) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => Some((
            parse_entry_date(start, zone)?,
            parse_entry_date(end, zone)?,
        )),
        _ => None,
    };

    Ok(EntryFilter {
        habit_id: params.habit_id,
        dates,
    })
}
