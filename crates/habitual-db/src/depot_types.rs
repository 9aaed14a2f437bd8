//! Request-scoped types shared between the middleware and handlers.
use crate::model::user::User;

/// Represents an authenticated user or public access in the depot.
#[derive(Debug, Clone)]
pub enum DepotUser {
    /// Authenticated user
    User(User),
    /// Unauthenticated/public access
    Public,
}

impl DepotUser {
    /// Returns the authenticated user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Public => None,
        }
    }
}
