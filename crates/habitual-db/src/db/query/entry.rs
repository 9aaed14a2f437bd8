//! Query functions for habit entries.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::{habit, habit_entry};
use crate::model::habit::{Habit, entry::HabitEntry, entry::NewHabitEntry};

/// Filters applied when listing a user's entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryFilter {
    pub habit_id: Option<uuid::Uuid>,
    /// Inclusive `(start, end)` day range.
    pub dates: Option<(NaiveDate, NaiveDate)>,
}

/// ## Summary
/// Records a completion for a day, replacing value and notes if the user
/// already logged that habit on that day.
///
/// ## Errors
/// Returns a database error if the upsert fails.
pub async fn upsert_entry(
    conn: &mut AsyncPgConnection,
    new_entry: &NewHabitEntry<'_>,
) -> QueryResult<HabitEntry> {
    diesel::insert_into(habit_entry::table)
        .values(new_entry)
        .on_conflict((
            habit_entry::user_id,
            habit_entry::habit_id,
            habit_entry::entry_date,
        ))
        .do_update()
        .set((
            habit_entry::value.eq(excluded(habit_entry::value)),
            habit_entry::notes.eq(excluded(habit_entry::notes)),
            habit_entry::updated_at.eq(diesel::dsl::now),
        ))
        .returning(HabitEntry::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads the most recent `limit` entries of each habit in one query, grouped in
/// the order of `habits`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn recent_for_habits(
    conn: &mut AsyncPgConnection,
    habits: &[Habit],
    limit: usize,
) -> QueryResult<Vec<Vec<HabitEntry>>> {
    let entries = HabitEntry::belonging_to(habits)
        .select(HabitEntry::as_select())
        .order((habit_entry::habit_id, habit_entry::entry_date.desc()))
        .load(conn)
        .await?;

    Ok(keep_recent(entries.grouped_by(habits), limit))
}

/// Trims every group to its first `limit` entries. Groups are newest first.
fn keep_recent(mut grouped: Vec<Vec<HabitEntry>>, limit: usize) -> Vec<Vec<HabitEntry>> {
    for entries in &mut grouped {
        entries.truncate(limit);
    }
    grouped
}

/// ## Summary
/// Lists a user's entries together with their habit, newest day first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_for_user(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    filter: EntryFilter,
) -> QueryResult<Vec<(HabitEntry, Habit)>> {
    let mut query = habit_entry::table
        .inner_join(habit::table)
        .filter(habit_entry::user_id.eq(user_id))
        .select((HabitEntry::as_select(), Habit::as_select()))
        .order(habit_entry::entry_date.desc())
        .into_boxed();

    if let Some(habit_id) = filter.habit_id {
        query = query.filter(habit_entry::habit_id.eq(habit_id));
    }
    if let Some((start, end)) = filter.dates {
        query = query
            .filter(habit_entry::entry_date.ge(start))
            .filter(habit_entry::entry_date.le(end));
    }

    query.load(conn).await
}

/// ## Summary
/// Sums the logged values of a habit over an inclusive day range.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn total_in_range(
    conn: &mut AsyncPgConnection,
    habit_id: uuid::Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> QueryResult<i64> {
    let total: Option<i64> = habit_entry::table
        .filter(habit_entry::habit_id.eq(habit_id))
        .filter(habit_entry::entry_date.between(start, end))
        .select(diesel::dsl::sum(habit_entry::value))
        .get_result(conn)
        .await?;
    Ok(total.unwrap_or(0))
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_for_user(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(habit_entry::table.filter(habit_entry::user_id.eq(user_id)))
        .execute(conn)
        .await
}
