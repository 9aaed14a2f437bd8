//! Registration, login, password changes and account deletion.

use diesel_async::{AsyncPgConnection, scoped_futures::ScopedFutureExt};
use serde::Deserialize;

use habitual_core::constants::PASSWORD_AUTH_SOURCE;
use habitual_db::{
    db::{query, transaction::with_transaction},
    model::user::{NewUser, User, authuser::NewAuthUser},
};

use crate::auth::authenticate::verify_credentials;
use crate::auth::password::{check_password_strength, hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult, is_unique_violation};
use crate::group::role::ownership_successor;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Emails are compared trimmed and lower-cased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// ## Summary
/// Creates a user with a password credential.
///
/// ## Side Effects
/// - Inserts a user row
/// - Inserts an `auth_user` row holding the Argon2 hash
///
/// ## Errors
/// Returns a `ValidationError` for missing fields, a short password or an
/// email that is already registered.
#[tracing::instrument(skip(conn, form))]
pub async fn register(conn: &mut AsyncPgConnection, form: &RegisterForm) -> ServiceResult<User> {
    let (Some(name), Some(email), Some(password)) = (
        non_empty(form.name.as_deref().map(str::trim)),
        non_empty(form.email.as_deref().map(str::trim)),
        non_empty(form.password.as_deref()),
    ) else {
        return Err(ServiceError::validation(
            "Name, email and password are required",
        ));
    };
    check_password_strength("Password", password)?;

    let email = normalize_email(email);
    if query::user::find_by_email(conn, &email).await?.is_some() {
        return Err(ServiceError::validation("Email already registered"));
    }

    let password_hash = hash_password(password)?;

    let result = with_transaction(conn, |tx| {
        async move {
            let user = query::user::create_user(tx, &NewUser { name, email: &email }).await?;
            let _credential_row_count = query::user::upsert_credential(
                tx,
                &NewAuthUser {
                    auth_source: PASSWORD_AUTH_SOURCE.to_string(),
                    auth_id: password_hash,
                    user_id: user.id,
                },
            )
            .await?;
            Ok::<_, diesel::result::Error>(user)
        }
        .scope_boxed()
    })
    .await;

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            Ok(user)
        }
        Err(err) if is_unique_violation(&err) => {
            Err(ServiceError::validation("Email already registered"))
        }
        Err(err) => Err(err.into()),
    }
}

/// ## Errors
/// Returns a `ValidationError` for missing fields and `InvalidCredentials`
/// when the email and password do not match.
#[tracing::instrument(skip(conn, form))]
pub async fn login(conn: &mut AsyncPgConnection, form: &LoginForm) -> ServiceResult<User> {
    let (Some(email), Some(password)) = (
        non_empty(form.email.as_deref()),
        non_empty(form.password.as_deref()),
    ) else {
        return Err(ServiceError::validation("Email and password are required"));
    };

    verify_credentials(conn, &normalize_email(email), password).await
}

/// ## Summary
/// Replaces the user's password after checking the current one.
///
/// ## Errors
/// - `ValidationError` for missing fields, a short new password or a wrong current password
/// - `NotFound` when the user has no password credential
#[tracing::instrument(skip(conn, form), fields(user_id = %user_id))]
pub async fn change_password(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    form: &PasswordChangeForm,
) -> ServiceResult<()> {
    let (Some(current), Some(new)) = (
        non_empty(form.current_password.as_deref()),
        non_empty(form.new_password.as_deref()),
    ) else {
        return Err(ServiceError::validation(
            "Current password and new password are required",
        ));
    };
    check_password_strength("New password", new)?;

    let credential = query::user::find_credential(conn, user_id, PASSWORD_AUTH_SOURCE)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))?;

    verify_password(current, &credential.auth_id).map_err(|err| match err {
        ServiceError::InvalidCredentials => {
            ServiceError::validation("Current password is incorrect")
        }
        other => other,
    })?;

    let _credential_row_count = query::user::upsert_credential(
        conn,
        &NewAuthUser {
            auth_source: PASSWORD_AUTH_SOURCE.to_string(),
            auth_id: hash_password(new)?,
            user_id,
        },
    )
    .await?;

    tracing::info!("Password updated");

    Ok(())
}

/// ## Summary
/// Deletes a user and everything they own in one transaction.
///
/// ## Side Effects
/// - Deletes the user's entries, habits and group memberships
/// - Deletes owned groups left without members; other owned groups pass to
///   the earliest admin (or earliest member), whose member row is removed
/// - Deletes the user row; credentials cascade
///
/// ## Errors
/// Returns a database error if any statement fails; nothing is deleted then.
#[tracing::instrument(skip(conn), fields(user_id = %user_id))]
pub async fn delete_account(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> ServiceResult<()> {
    with_transaction(conn, |tx| {
        async move {
            let entries = query::entry::delete_for_user(tx, user_id).await?;
            let habits = query::habit::delete_for_user(tx, user_id).await?;
            let memberships = query::group::remove_memberships_of_user(tx, user_id).await?;
            tracing::debug!(entries, habits, memberships, "Removed user content");

            for group in query::group::owned_by(tx, user_id).await? {
                let members = query::group::members(tx, group.id).await?;
                if let Some(successor) = ownership_successor(&members) {
                    let _group_row_count =
                        query::group::transfer_ownership(tx, group.id, successor.user_id).await?;
                    let _member_row_count = query::group::remove_member(tx, successor.id).await?;
                    tracing::info!(
                        group_id = %group.id,
                        new_owner_id = %successor.user_id,
                        "Group ownership transferred"
                    );
                } else {
                    let _group_row_count = query::group::delete_group(tx, group.id).await?;
                    tracing::info!(group_id = %group.id, "Empty group deleted");
                }
            }

            let _user_row_count = query::user::delete_user(tx, user_id).await?;
            Ok::<_, ServiceError>(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!("Account deleted");

    Ok(())
}
