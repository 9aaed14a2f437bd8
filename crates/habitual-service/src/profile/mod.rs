//! User profile, default avatars and account lifecycle.

pub mod account;
pub mod avatar;

use diesel_async::AsyncPgConnection;
use serde::Serialize;

use habitual_db::{db::query, model::user::User};

use crate::error::{ServiceError, ServiceResult};

/// Profile view of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub active_habit_count: i64,
}

impl Profile {
    fn from_user(user: User, active_habit_count: i64) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            created_at: user.created_at,
            active_habit_count,
        }
    }
}

async fn profile_of(conn: &mut AsyncPgConnection, user: User) -> ServiceResult<Profile> {
    let active_habit_count = query::habit::count_active(conn, user.id).await?;
    Ok(Profile::from_user(user, active_habit_count))
}

/// ## Summary
/// Reloads a user row.
///
/// ## Errors
/// Returns `NotFound` ("User not found") if the user no longer exists.
pub async fn current_user(conn: &mut AsyncPgConnection, user_id: uuid::Uuid) -> ServiceResult<User> {
    query::user::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))
}

/// ## Errors
/// Returns `NotFound` if the user no longer exists.
#[tracing::instrument(skip(conn), fields(user_id = %user_id))]
pub async fn load_profile(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
) -> ServiceResult<Profile> {
    let user = current_user(conn, user_id).await?;
    profile_of(conn, user).await
}

/// ## Summary
/// Stores a new display name, trimmed.
///
/// ## Errors
/// Returns a `ValidationError` when the name is missing or blank.
#[tracing::instrument(skip(conn, name), fields(user_id = %user_id))]
pub async fn rename(
    conn: &mut AsyncPgConnection,
    user_id: uuid::Uuid,
    name: Option<&str>,
) -> ServiceResult<Profile> {
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServiceError::validation("Name is required"))?;

    let user = query::user::update_name(conn, user_id, name).await?;
    tracing::info!("Profile name updated");

    profile_of(conn, user).await
}

/// ## Summary
/// Points the user's avatar at one of the bundled default images.
///
/// ## Errors
/// Returns a `ValidationError` when the URL is not a default avatar URL.
#[tracing::instrument(skip(conn, config), fields(user_id = %user_id))]
pub async fn set_default_avatar(
    conn: &mut AsyncPgConnection,
    config: &habitual_core::config::AvatarsConfig,
    user_id: uuid::Uuid,
    avatar_url: Option<&str>,
) -> ServiceResult<Profile> {
    let avatar_url = avatar_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ServiceError::validation("Avatar URL is required"))?;
    avatar::validate_default_avatar_url(avatar_url, &config.url_prefix)?;

    let user = query::user::update_avatar(conn, user_id, avatar_url).await?;
    tracing::info!(avatar = %avatar_url, "Default avatar selected");

    profile_of(conn, user).await
}
