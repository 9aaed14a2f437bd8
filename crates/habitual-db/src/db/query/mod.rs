//! Query builders and query functions, one module per aggregate.

pub mod entry;
pub mod group;
pub mod habit;
pub mod user;
