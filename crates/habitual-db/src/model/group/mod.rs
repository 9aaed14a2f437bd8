pub mod member;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Queryable, Selectable, Identifiable, Associations, Serialize,
)]
#[diesel(table_name = schema::group)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::user::User, foreign_key = owner_id))]
pub struct Group {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub owner_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = schema::group)]
pub struct NewGroup<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub invite_code: &'a str,
    pub owner_id: uuid::Uuid,
}
