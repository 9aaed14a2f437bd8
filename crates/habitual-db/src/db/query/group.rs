//! Query functions for groups and their memberships.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::enums::MemberRole;
use crate::db::schema::{group, group_member, user};
use crate::model::group::{Group, NewGroup, member::GroupMember, member::NewGroupMember};
use crate::model::user::User;

type BoxedQuery<'a> =
    group::BoxedQuery<'a, diesel::pg::Pg, diesel::dsl::AsSelect<Group, diesel::pg::Pg>>;

/// ## Summary
/// Returns a query to select all groups.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    group::table.select(Group::as_select()).into_boxed()
}

/// ## Summary
/// Returns a query to select the groups a user owns or belongs to, newest first.
#[must_use]
pub fn visible_to(user_id: uuid::Uuid) -> BoxedQuery<'static> {
    let member_of = group_member::table
        .filter(group_member::user_id.eq(user_id))
        .select(group_member::group_id);

    all()
        .filter(group::owner_id.eq(user_id).or(group::id.eq_any(member_of)))
        .order(group::created_at.desc())
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_for_user(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> QueryResult<Vec<Group>> {
    visible_to(user_id).load(conn).await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(
    conn: &mut AsyncPgConnection,
    group_id: uuid::Uuid,
) -> QueryResult<Option<Group>> {
    all()
        .filter(group::id.eq(group_id))
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_invite_code(
    conn: &mut AsyncPgConnection,
    invite_code: &str,
) -> QueryResult<Option<Group>> {
    all()
        .filter(group::invite_code.eq(invite_code))
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn owned_by(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> QueryResult<Vec<Group>> {
    all()
        .filter(group::owner_id.eq(user_id))
        .order(group::created_at.asc())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails (including an invite code collision).
pub async fn create_group(
    conn: &mut AsyncPgConnection,
    new_group: &NewGroup<'_>,
) -> QueryResult<Group> {
    diesel::insert_into(group::table)
        .values(new_group)
        .returning(Group::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn transfer_ownership(
    conn: &mut AsyncPgConnection,
    group_id: uuid::Uuid,
    new_owner_id: uuid::Uuid,
) -> QueryResult<usize> {
    diesel::update(group::table.filter(group::id.eq(group_id)))
        .set((
            group::owner_id.eq(new_owner_id),
            group::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
}

/// ## Summary
/// Deletes a group; its memberships cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_group(conn: &mut AsyncPgConnection, group_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(group::table.filter(group::id.eq(group_id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Lists a group's members with their user records, earliest joiner first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn members_with_users(
    conn: &mut AsyncPgConnection,
    group_id: uuid::Uuid,
) -> QueryResult<Vec<(GroupMember, User)>> {
    group_member::table
        .inner_join(user::table)
        .filter(group_member::group_id.eq(group_id))
        .select((GroupMember::as_select(), User::as_select()))
        .order(group_member::joined_at.asc())
        .load(conn)
        .await
}

/// ## Summary
/// Lists a group's memberships, earliest joiner first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn members(
    conn: &mut AsyncPgConnection,
    group_id: uuid::Uuid,
) -> QueryResult<Vec<GroupMember>> {
    group_member::table
        .filter(group_member::group_id.eq(group_id))
        .select(GroupMember::as_select())
        .order(group_member::joined_at.asc())
        .load(conn)
        .await
}

/// ## Summary
/// Finds the membership of a user in a group.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_membership(
    conn: &mut AsyncPgConnection,
    group_id: uuid::Uuid,
    user_id: uuid::Uuid,
) -> QueryResult<Option<GroupMember>> {
    group_member::table
        .filter(group_member::group_id.eq(group_id))
        .filter(group_member::user_id.eq(user_id))
        .select(GroupMember::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Finds a membership row by its ID within a group.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_member(
    conn: &mut AsyncPgConnection,
    group_id: uuid::Uuid,
    member_id: uuid::Uuid,
) -> QueryResult<Option<GroupMember>> {
    group_member::table
        .filter(group_member::group_id.eq(group_id))
        .filter(group_member::id.eq(member_id))
        .select(GroupMember::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Errors
/// Returns a database error if the insert fails (including a duplicate membership).
pub async fn add_member(
    conn: &mut AsyncPgConnection,
    new_member: &NewGroupMember,
) -> QueryResult<GroupMember> {
    diesel::insert_into(group_member::table)
        .values(new_member)
        .returning(GroupMember::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn remove_member(conn: &mut AsyncPgConnection, member_id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(group_member::table.filter(group_member::id.eq(member_id)))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn remove_memberships_of_user(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> QueryResult<usize> {
    diesel::delete(group_member::table.filter(group_member::user_id.eq(user_id)))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails or the membership does not exist.
pub async fn set_member_role(
    conn: &mut AsyncPgConnection,
    member_id: uuid::Uuid,
    role: MemberRole,
) -> QueryResult<GroupMember> {
    diesel::update(group_member::table.filter(group_member::id.eq(member_id)))
        .set(group_member::role.eq(role))
        .returning(GroupMember::as_returning())
        .get_result(conn)
        .await
}
