//! Shared building blocks for the habitual server: configuration, route
//! constants, the core error type and small domain value types.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
