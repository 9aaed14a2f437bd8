use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

/// One logged completion of a habit on a calendar day.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::habit_entry)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::habit::Habit, foreign_key = habit_id))]
pub struct HabitEntry {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub habit_id: uuid::Uuid,
    pub entry_date: chrono::NaiveDate,
    pub value: i32,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::habit_entry)]
pub struct NewHabitEntry<'a> {
    pub user_id: uuid::Uuid,
    pub habit_id: uuid::Uuid,
    pub entry_date: chrono::NaiveDate,
    pub value: i32,
    pub notes: Option<&'a str>,
}
