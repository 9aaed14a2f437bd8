//! Account endpoints: registration, login, password change and deletion.

use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use habitual_service::{
    auth::require_user,
    profile::account::{self, LoginForm, PasswordChangeForm, RegisterForm},
};

use super::{
    AUTH_ROUTE_COMPONENT,
    extract::json_body,
    response::{MessageResponse, UserSummary},
};
use crate::{db_handler::get_db_from_depot, error::AppResult};

/// ## Summary
/// Registration response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: uuid::Uuid,
    pub email: String,
    pub name: String,
}

/// ## Summary
/// POST /api/auth/register - Register a new user with email and password
///
/// ## Side Effects
/// - Creates a user row
/// - Creates an `auth_user` row with the hashed password
///
/// ## Errors
/// Returns HTTP 400 for missing fields, a short password or a taken email.
#[handler]
#[tracing::instrument(skip_all)]
async fn register(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<RegisterResponse>> {
    let form: RegisterForm = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let user = account::register(&mut conn, &form).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(RegisterResponse {
        user_id: user.id,
        email: user.email,
        name: user.name,
    }))
}

/// ## Summary
/// POST /api/auth/login - Checks an email and password pair
///
/// ## Errors
/// Returns HTTP 401 when the credentials do not match.
#[handler]
#[tracing::instrument(skip_all)]
async fn login(req: &mut Request, depot: &mut Depot) -> AppResult<Json<UserSummary>> {
    let form: LoginForm = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let user = account::login(&mut conn, &form).await?;

    tracing::debug!(user_id = %user.id, "Login succeeded");
    Ok(Json(user.into()))
}

/// ## Summary
/// POST /api/auth/reset-password - Replaces the caller's password
///
/// ## Errors
/// Returns HTTP 400 when the current password is wrong or the new one is too short.
#[handler]
#[tracing::instrument(skip_all)]
async fn reset_password(req: &mut Request, depot: &mut Depot) -> AppResult<Json<MessageResponse>> {
    let user = require_user(depot)?;
    let form: PasswordChangeForm = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    account::change_password(&mut conn, user.id, &form).await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// ## Summary
/// DELETE /api/auth/delete-account - Deletes the caller and everything they own
///
/// Owned groups with members left are handed over instead of deleted.
#[handler]
#[tracing::instrument(skip_all)]
async fn delete_account(depot: &mut Depot) -> AppResult<Json<MessageResponse>> {
    let user = require_user(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    account::delete_account(&mut conn, user.id).await?;

    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

/// Routes reachable without credentials.
#[must_use]
pub fn public_routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("register").post(register))
        .push(Router::with_path("login").post(login))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("reset-password").post(reset_password))
        .push(Router::with_path("delete-account").delete(delete_account))
}
