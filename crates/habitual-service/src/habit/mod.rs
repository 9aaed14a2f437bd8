//! Habits and their completion entries.
//!
//! - `schedule`: reduces a user-authored recurrence to a stored [`Frequency`]
//! - `period`: day/week/month boundaries used to bucket entries
//! - `service`: habit CRUD and progress
//! - `entry`: logging and listing completions
//!
//! [`Frequency`]: habitual_core::types::Frequency

pub mod entry;
pub mod period;
pub mod schedule;
pub mod service;
