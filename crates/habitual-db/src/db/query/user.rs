//! Query functions for users and their credentials.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::{auth_user, user};
use crate::model::user::{NewUser, User, authuser::AuthUser, authuser::NewAuthUser};

type BoxedQuery<'a> = user::BoxedQuery<'a, diesel::pg::Pg, diesel::dsl::AsSelect<User, diesel::pg::Pg>>;

/// ## Summary
/// Returns a query to select all users.
#[must_use]
pub fn all() -> BoxedQuery<'static> {
    user::table.select(User::as_select()).into_boxed()
}

/// ## Summary
/// Returns a query to find a user by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> BoxedQuery<'static> {
    all().filter(user::id.eq(id))
}

/// ## Summary
/// Returns a query to find a user by email address.
#[must_use]
pub fn by_email(email: &str) -> BoxedQuery<'_> {
    all().filter(user::email.eq(email))
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_id(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
) -> QueryResult<Option<User>> {
    by_id(id).first(conn).await.optional()
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_email(
    conn: &mut AsyncPgConnection,
    email: &str,
) -> QueryResult<Option<User>> {
    by_email(email).first(conn).await.optional()
}

/// ## Summary
/// Inserts a new user and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails (including a duplicate email).
pub async fn create_user(conn: &mut AsyncPgConnection, new_user: &NewUser<'_>) -> QueryResult<User> {
    diesel::insert_into(user::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails or the user does not exist.
pub async fn update_name(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    name: &str,
) -> QueryResult<User> {
    diesel::update(user::table.filter(user::id.eq(id)))
        .set((user::name.eq(name), user::updated_at.eq(diesel::dsl::now)))
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails or the user does not exist.
pub async fn update_avatar(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    avatar: &str,
) -> QueryResult<User> {
    diesel::update(user::table.filter(user::id.eq(id)))
        .set((user::avatar.eq(avatar), user::updated_at.eq(diesel::dsl::now)))
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Deletes a user; credential rows cascade.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_user(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> QueryResult<usize> {
    diesel::delete(user::table.filter(user::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Returns the credential row of the given source for a user.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_credential(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    auth_source: &str,
) -> QueryResult<Option<AuthUser>> {
    auth_user::table
        .filter(auth_user::user_id.eq(user_id))
        .filter(auth_user::auth_source.eq(auth_source))
        .select(AuthUser::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Creates or replaces the credential of the given source for a user.
///
/// ## Errors
/// Returns a database error if the upsert fails.
pub async fn upsert_credential(
    conn: &mut AsyncPgConnection,
    credential: &NewAuthUser,
) -> QueryResult<usize> {
    diesel::insert_into(auth_user::table)
        .values(credential)
        .on_conflict((auth_user::user_id, auth_user::auth_source))
        .do_update()
        .set((
            auth_user::auth_id.eq(excluded(auth_user::auth_id)),
            auth_user::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .await
}
