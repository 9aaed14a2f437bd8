//! Habit CRUD and per-period progress.

use chrono::NaiveDate;
use diesel_async::AsyncPgConnection;
use serde::Deserialize;

use habitual_core::constants::RECENT_ENTRY_LIMIT;
use habitual_core::types::Frequency;
use habitual_db::{
    db::query,
    model::habit::{Habit, HabitChanges, NewHabit, entry::HabitEntry},
};

use super::period::{CalendarZone, DateRange, period_days};
use super::schedule::{RecurrenceInput, lenient_integer, normalize};
use crate::error::{ServiceError, ServiceResult};

/// Body of the create and update habit requests.
///
/// Recurrence fields are only read on create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub target: Option<i64>,
    pub unit: Option<String>,
    #[serde(flatten)]
    pub recurrence: RecurrenceInput,
}

impl HabitForm {
    /// ## Errors
    /// Returns a `ValidationError` when the name is missing or blank.
    pub fn name(&self) -> ServiceResult<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ServiceError::validation("Habit name is required"))
    }

    /// The requested target, or 1 when missing, not positive or out of range.
    #[must_use]
    pub fn target(&self) -> i32 {
        self.target
            .and_then(|target| i32::try_from(target).ok())
            .filter(|target| *target > 0)
            .unwrap_or(1)
    }

    #[must_use]
    pub fn color<'a>(&'a self, default_color: &'a str) -> &'a str {
        self.color
            .as_deref()
            .filter(|color| !color.is_empty())
            .unwrap_or(default_color)
    }
}

/// An active habit with its most recent entries, newest day first.
#[derive(Debug, Clone)]
pub struct HabitWithEntries {
    pub habit: Habit,
    pub entries: Vec<HabitEntry>,
}

/// Completion state of a habit over the period containing a date.
#[derive(Debug, Clone)]
pub struct HabitProgress {
    pub habit_id: uuid::Uuid,
    pub frequency: Frequency,
    pub period: DateRange<chrono::Utc>,
    pub total: i64,
    pub target: i32,
}

impl HabitProgress {
    #[must_use]
    pub fn completed(&self) -> bool {
        self.total >= i64::from(self.target)
    }
}

/// ## Summary
/// Lists the user's active habits, newest first, each with its recent entries.
///
/// ## Errors
/// Returns a database error if a query fails.
#[tracing::instrument(skip(conn), fields(user_id = %user_id))]
pub async fn list_habits(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> ServiceResult<Vec<HabitWithEntries>> {
    let habits = query::habit::list_active(conn, user_id).await?;
    let entries = query::entry::recent_for_habits(conn, &habits, RECENT_ENTRY_LIMIT).await?;

    Ok(habits
        .into_iter()
        .zip(entries)
        .map(|(habit, entries)| HabitWithEntries { habit, entries })
        .collect())
}

/// ## Summary
/// Creates a habit, storing the frequency derived from the form's recurrence.
///
/// ## Errors
/// Returns a `ValidationError` when the name is missing, or a database error.
#[tracing::instrument(skip(conn, form), fields(user_id = %user_id))]
pub async fn create_habit(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    form: &HabitForm,
    default_color: &str,
) -> ServiceResult<Habit> {
    let name = form.name()?;
    let frequency = normalize(&form.recurrence);

    let habit = query::habit::create_habit(
        conn,
        &NewHabit {
            user_id,
            name,
            description: form.description.as_deref(),
            color: form.color(default_color),
            frequency: frequency.into(),
            target: form.target(),
            unit: form.unit.as_deref(),
        },
    )
    .await?;

    tracing::info!(habit_id = %habit.id, %frequency, "Habit created");

    Ok(habit)
}

async fn find_active_habit(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    habit_id: uuid::Uuid,
) -> ServiceResult<Habit> {
    query::habit::find_active(conn, user_id, habit_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Habit not found"))
}

/// ## Summary
/// Updates the editable fields of one of the user's active habits.
///
/// The stored frequency is left as it was at creation.
///
/// ## Errors
/// Returns a `ValidationError` when the name is missing and `NotFound` when the
/// habit is not an active habit of the user.
#[tracing::instrument(skip(conn, form), fields(user_id = %user_id, habit_id = %habit_id))]
pub async fn update_habit(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    habit_id: uuid::Uuid,
    form: &HabitForm,
    default_color: &str,
) -> ServiceResult<Habit> {
    let name = form.name()?;
    let habit = find_active_habit(conn, user_id, habit_id).await?;

    let changes = HabitChanges {
        name,
        description: form.description.as_deref(),
        color: form.color(default_color),
        target: form.target(),
        unit: form.unit.as_deref(),
    };

    Ok(query::habit::update_habit(conn, habit.id, &changes).await?)
}

/// ## Summary
/// Soft-deletes one of the user's active habits. Its entries are kept.
///
/// ## Errors
/// Returns `NotFound` when the habit is not an active habit of the user.
#[tracing::instrument(skip(conn), fields(user_id = %user_id, habit_id = %habit_id))]
pub async fn archive_habit(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    habit_id: uuid::Uuid,
) -> ServiceResult<()> {
    let habit = find_active_habit(conn, user_id, habit_id).await?;
    let _archived = query::habit::archive_habit(conn, habit.id).await?;

    tracing::info!("Habit archived");

    Ok(())
}

/// ## Summary
/// Sums the entries of a habit over the day, week or month containing `date`.
///
/// ## Errors
/// Returns `NotFound` when the habit is not an active habit of the user.
#[tracing::instrument(skip(conn), fields(user_id = %user_id, habit_id = %habit_id))]
pub async fn habit_progress(
    conn: &mut AsyncPgConnection,
    zone: CalendarZone,
    user_id: uuid::Uuid,
    habit_id: uuid::Uuid,
    date: NaiveDate,
) -> ServiceResult<HabitProgress> {
    let habit = find_active_habit(conn, user_id, habit_id).await?;
    let frequency = Frequency::from(habit.frequency);
    let (first, last) = period_days(date, frequency);

    let total = query::entry::total_in_range(conn, habit.id, first, last).await?;

    Ok(HabitProgress {
        habit_id: habit.id,
        frequency,
        period: zone.period_for_date(date, frequency),
        total,
        target: habit.target,
    })
}
