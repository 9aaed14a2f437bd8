//! Bundled default avatar images.

use salvo::{Depot, Request, Router, handler, writing::Json};
use serde::{Deserialize, Serialize};

use habitual_service::{
    auth::require_user,
    profile::{
        self, Profile,
        avatar::{DefaultAvatar, list_default_avatars},
    },
};

use super::extract::json_body;
use crate::{
    config::get_config_from_depot,
    db_handler::get_db_from_depot,
    error::{AppError, AppResult},
};

#[derive(Debug, Serialize)]
struct AvatarList {
    avatars: Vec<DefaultAvatar>,
}

/// The avatar URL is kept loose so a non-string value is reported as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultAvatarSelection {
    avatar_url: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ProfileEnvelope {
    user: Profile,
}

/// ## Summary
/// GET /api/default-avatars - Lists the images under the configured avatar directory
///
/// ## Errors
/// Returns HTTP 500 when the directory cannot be read.
#[handler]
#[tracing::instrument(skip_all)]
async fn default_avatars(depot: &mut Depot) -> AppResult<Json<AvatarList>> {
    let config = get_config_from_depot(depot)?;

    let avatars = list_default_avatars(&config.avatars).await.map_err(|e| {
        tracing::error!(error = %e, dir = %config.avatars.default_dir, "Failed to list default avatars");
        AppError::Internal("Failed to load default avatars".to_string())
    })?;

    Ok(Json(AvatarList { avatars }))
}

/// ## Summary
/// POST /api/set-default-avatar - Selects one of the bundled avatar images
#[handler]
#[tracing::instrument(skip_all)]
async fn set_default_avatar(
    req: &mut Request,
    depot: &mut Depot,
) -> AppResult<Json<ProfileEnvelope>> {
    let user = require_user(depot)?;
    let selection: DefaultAvatarSelection = json_body(req).await?;
    let config = get_config_from_depot(depot)?;

    let avatar_url = selection
        .avatar_url
        .as_ref()
        .and_then(serde_json::Value::as_str);

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let user = profile::set_default_avatar(&mut conn, &config.avatars, user.id, avatar_url).await?;

    Ok(Json(ProfileEnvelope { user }))
}

#[must_use]
pub fn public_routes() -> Router {
    Router::with_path("default-avatars").get(default_avatars)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("set-default-avatar").post(set_default_avatar)
}
