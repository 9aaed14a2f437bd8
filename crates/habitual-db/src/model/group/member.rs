use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::{
    db::{enums::MemberRole, schema},
    model,
};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::group_member)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(model::user::User, foreign_key = user_id))]
#[diesel(belongs_to(model::group::Group, foreign_key = group_id))]
pub struct GroupMember {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub group_id: uuid::Uuid,
    pub role: MemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::group_member)]
pub struct NewGroupMember {
    pub user_id: uuid::Uuid,
    pub group_id: uuid::Uuid,
    pub role: MemberRole,
}
