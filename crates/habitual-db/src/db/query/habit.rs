//! Query functions for habits.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::habit;
use crate::model::habit::{Habit, HabitChanges, NewHabit};

type BoxedQuery<'a> =
    habit::BoxedQuery<'a, diesel::pg::Pg, diesel::dsl::AsSelect<Habit, diesel::pg::Pg>>;

/// ## Summary
/// Returns a query to select all habits owned by a user.
#[must_use]
pub fn owned_by(user_id: uuid::Uuid) -> BoxedQuery<'static> {
    habit::table
        .select(Habit::as_select())
        .filter(habit::user_id.eq(user_id))
        .into_boxed()
}

/// ## Summary
/// Returns a query to select a user's active habits, newest first.
#[must_use]
pub fn active_for_user(user_id: uuid::Uuid) -> BoxedQuery<'static> {
    owned_by(user_id)
        .filter(habit::is_active.eq(true))
        .order(habit::created_at.desc())
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_active(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<Habit>> {
    active_for_user(user_id).load(conn).await
}

/// ## Summary
/// Finds an active habit by ID, scoped to its owner.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_active(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    habit_id: uuid::Uuid,
) -> QueryResult<Option<Habit>> {
    active_for_user(user_id)
        .filter(habit::id.eq(habit_id))
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Finds a habit by ID scoped to its owner, whether or not it is archived.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_owned(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    habit_id: uuid::Uuid,
) -> QueryResult<Option<Habit>> {
    owned_by(user_id)
        .filter(habit::id.eq(habit_id))
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_active(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> QueryResult<i64> {
    habit::table
        .filter(habit::user_id.eq(user_id))
        .filter(habit::is_active.eq(true))
        .count()
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_habit(
    conn: &mut AsyncPgConnection,
    new_habit: &NewHabit<'_>,
) -> QueryResult<Habit> {
    diesel::insert_into(habit::table)
        .values(new_habit)
        .returning(Habit::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails or the habit does not exist.
pub async fn update_habit(
    conn: &mut AsyncPgConnection,
    habit_id: uuid::Uuid,
    changes: &HabitChanges<'_>,
) -> QueryResult<Habit> {
    diesel::update(habit::table.filter(habit::id.eq(habit_id)))
        .set((changes, habit::updated_at.eq(diesel::dsl::now)))
        .returning(Habit::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Soft-deletes a habit by clearing its active flag.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn archive_habit(conn: &mut AsyncPgConnection, habit_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::update(habit::table.filter(habit::id.eq(habit_id)))
        .set((
            habit::is_active.eq(false),
            habit::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_for_user(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(habit::table.filter(habit::user_id.eq(user_id)))
        .execute(conn)
        .await
}
