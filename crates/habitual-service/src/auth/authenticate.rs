use base64::Engine;
use diesel_async::AsyncPgConnection;

use crate::error::{ServiceError, ServiceResult};
use crate::auth::password::verify_password;
use habitual_core::config::{AuthMethod, Settings};
use habitual_core::constants::PASSWORD_AUTH_SOURCE;
use habitual_db::{
    db::query,
    model::user::{NewUser, User},
};

/// Get the user configured in settings for single user authentication.
///
/// If it doesn't exist, insert it into the database.
///
/// ## Errors
///
/// Returns an error if the user cannot be created or retrieved from the database.
#[tracing::instrument(skip(conn, config))]
async fn authenticate_single_user(
    conn: &mut AsyncPgConnection,
    config: &Settings,
) -> ServiceResult<User> {
    tracing::debug!("Authenticating single user");

    let single_user_config =
        config
            .auth
            .single_user
            .as_ref()
            .ok_or(ServiceError::InvalidConfiguration(
                "Single user config is missing".to_string(),
            ))?;

    if let Some(user) = query::user::find_by_email(conn, &single_user_config.email).await? {
        tracing::debug!(user_email = %user.email, "Single user already exists");
        return Ok(user);
    }

    tracing::debug!(email = %single_user_config.email, "Creating single user");

    let user = query::user::create_user(
        conn,
        &NewUser {
            name: &single_user_config.name,
            email: &single_user_config.email,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, user_email = %user.email, "Single user created");

    Ok(user)
}

/// ## Summary
/// Extracts `(email, password)` from an `Authorization: Basic ...` header value.
///
/// Returns `None` for other schemes and for malformed payloads.
#[must_use]
pub fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let (scheme, payload) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;

    Some((email.to_string(), password.to_string()))
}

/// ## Summary
/// Looks up a user by email and checks the password against their stored hash.
///
/// ## Errors
/// Returns `InvalidCredentials` when the user, their password record or the
/// password itself does not match.
#[tracing::instrument(skip(conn, password))]
pub async fn verify_credentials(
    conn: &mut AsyncPgConnection,
    email: &str,
    password: &str,
) -> ServiceResult<User> {
    let Some(user) = query::user::find_by_email(conn, email).await? else {
        tracing::debug!("No user with this email");
        return Err(ServiceError::InvalidCredentials);
    };

    let Some(credential) =
        query::user::find_credential(conn, user.id, PASSWORD_AUTH_SOURCE).await?
    else {
        tracing::debug!(user_id = %user.id, "User has no password credential");
        return Err(ServiceError::InvalidCredentials);
    };

    verify_password(password, &credential.auth_id)?;

    Ok(user)
}

#[tracing::instrument(skip(req, conn))]
async fn authenticate_basic(
    req: &salvo::Request,
    conn: &mut AsyncPgConnection,
) -> ServiceResult<User> {
    let header = req
        .headers()
        .get(salvo::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServiceError::NotAuthenticated)?;

    let (email, password) =
        parse_basic_credentials(header).ok_or(ServiceError::NotAuthenticated)?;

    verify_credentials(conn, &email, &password).await
}

/// ## Summary
/// Authenticate a user based on the configured authentication method.
///
/// ## Errors
/// Returns `NotAuthenticated` or `InvalidCredentials` when the request carries
/// no usable credentials, and other errors if the lookup fails.
#[tracing::instrument(skip(req, conn, config))]
pub async fn authenticate(
    req: &salvo::Request,
    conn: &mut AsyncPgConnection,
    config: &Settings,
) -> ServiceResult<User> {
    tracing::trace!(auth_method = ?config.auth.method, "Authenticating request");

    match config.auth.method {
        AuthMethod::SingleUser => authenticate_single_user(conn, config).await,
        AuthMethod::BasicAuth => authenticate_basic(req, conn).await,
    }
}
