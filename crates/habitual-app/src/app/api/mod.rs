mod auth;
mod avatars;
mod entries;
mod extract;
mod groups;
mod habits;
mod healthcheck;
mod profile;
mod response;

use salvo::Router;

use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use habitual_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, AUTH_ROUTE_COMPONENT, AUTH_ROUTE_PREFIX,
    GROUPS_ROUTE_COMPONENT, GROUPS_ROUTE_PREFIX, HABIT_ENTRIES_ROUTE_COMPONENT,
    HABIT_ENTRIES_ROUTE_PREFIX, HABITS_ROUTE_COMPONENT, HABITS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the `/api` router.
///
/// Healthcheck, registration, login and the default avatar listing are public;
/// everything else runs behind [`AuthMiddleware`].
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(auth::public_routes())
        .push(avatars::public_routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(auth::routes())
                .push(profile::routes())
                .push(avatars::routes())
                .push(habits::routes())
                .push(entries::routes())
                .push(groups::routes()),
        )
}
