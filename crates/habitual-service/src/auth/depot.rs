//! Depot helpers for extracting the authenticated user from Salvo requests.

use crate::error::{ServiceError, ServiceResult};
use habitual_db::{depot_types::DepotUser, model::user::User};

pub mod depot_keys {
    pub const AUTHENTICATED_USER: &str = "__authenticated_user";
}

/// Get the authenticated user from the depot.
///
/// ## Errors
///
/// Returns `NotAuthenticated` if no user is found in the depot or if the user is public.
pub fn get_user_from_depot(depot: &salvo::Depot) -> ServiceResult<&User> {
    let depot_user = depot
        .get::<DepotUser>(depot_keys::AUTHENTICATED_USER)
        .map_err(|_e| ServiceError::NotAuthenticated)?;

    depot_user.user().ok_or(ServiceError::NotAuthenticated)
}

/// Like [`get_user_from_depot`], but returns an owned copy so the depot
/// borrow ends before the handler takes a database connection from it.
///
/// ## Errors
///
/// Returns `NotAuthenticated` for public requests.
pub fn require_user(depot: &salvo::Depot) -> ServiceResult<User> {
    get_user_from_depot(depot).cloned()
}

/// Check if the request is from an authenticated user (not public).
#[must_use]
pub fn is_authenticated(depot: &salvo::Depot) -> bool {
    depot
        .get::<DepotUser>(depot_keys::AUTHENTICATED_USER)
        .is_ok_and(|u| matches!(u, DepotUser::User(_)))
}
