//! Groups, invite codes and member roles.

pub mod invite;
pub mod role;
pub mod service;
