//! Profile endpoints for the authenticated user.

use salvo::{Depot, Request, Router, handler, writing::Json};
use serde::Deserialize;

use habitual_service::{
    auth::require_user,
    error::ServiceError,
    profile::{self, Profile},
};

use super::{extract::json_body, response::UserSummary};
use crate::{
    db_handler::get_db_from_depot,
    error::{AppError, AppResult},
};

#[derive(Debug, Default, Deserialize)]
struct ProfileUpdate {
    name: Option<String>,
}

/// ## Summary
/// GET /api/profile - The caller's profile with their active habit count
#[handler]
#[tracing::instrument(skip_all)]
async fn get_profile(depot: &mut Depot) -> AppResult<Json<Profile>> {
    let user = require_user(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    Ok(Json(profile::load_profile(&mut conn, user.id).await?))
}

/// ## Summary
/// PUT /api/profile - Renames the caller
#[handler]
#[tracing::instrument(skip_all)]
async fn update_profile(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Profile>> {
    let user = require_user(depot)?;
    let update: ProfileUpdate = json_body(req).await?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    Ok(Json(
        profile::rename(&mut conn, user.id, update.name.as_deref()).await?,
    ))
}

/// ## Summary
/// GET /api/user/me - Public fields of the caller
///
/// ## Errors
/// A user deleted since authentication is reported as HTTP 401.
#[handler]
#[tracing::instrument(skip_all)]
async fn me(depot: &mut Depot) -> AppResult<Json<UserSummary>> {
    let user = require_user(depot)?;

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    match profile::current_user(&mut conn, user.id).await {
        Ok(user) => Ok(Json(user.into())),
        Err(ServiceError::NotFound(_)) => Err(AppError::Unauthorized("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::new()
        .push(
            Router::with_path("profile")
                .get(get_profile)
                .put(update_profile),
        )
        .push(Router::with_path("user/me").get(me))
}
