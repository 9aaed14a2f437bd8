pub mod entry;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::{enums::Frequency, schema};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::habit)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::user::User, foreign_key = user_id))]
pub struct Habit {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub frequency: Frequency,
    pub target: i32,
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::habit)]
pub struct NewHabit<'a> {
    pub user_id: uuid::Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub color: &'a str,
    pub frequency: Frequency,
    pub target: i32,
    pub unit: Option<&'a str>,
}

/// Editable habit fields; `None` leaves the stored value untouched.
///
/// `frequency` is fixed at creation and has no column here.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::habit)]
pub struct HabitChanges<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub color: &'a str,
    pub target: i32,
    pub unit: Option<&'a str>,
}
