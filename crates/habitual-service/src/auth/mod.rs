//! Authentication flow.
//!
//! ## Module Organization
//!
//! - `authenticate`: Request authentication (single user, HTTP Basic)
//! - `depot`: Helpers for extracting the authenticated user from Salvo requests
//! - `password`: Password hashing and verification with Argon2

pub mod authenticate;
pub mod depot;
pub mod password;

pub use depot::{get_user_from_depot, is_authenticated, require_user};
