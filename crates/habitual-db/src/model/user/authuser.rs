use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Credential row; for the `password` source `auth_id` holds an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::auth_user)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::User, foreign_key = user_id))]
pub struct AuthUser {
    pub id: uuid::Uuid,
    pub auth_source: String,
    pub auth_id: String,
    pub user_id: uuid::Uuid,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::auth_user)]
pub struct NewAuthUser {
    pub auth_source: String,
    pub auth_id: String,
    pub user_id: uuid::Uuid,
}
