pub mod group;
pub mod habit;
pub mod user;
