//! Business logic for habitual: recurrence normalization, period bucketing,
//! authentication and the account, habit, entry and group services.

pub mod auth;
pub mod error;
pub mod group;
pub mod habit;
pub mod profile;
