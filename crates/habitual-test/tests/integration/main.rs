//! HTTP-level tests for the `/api` router.

mod accounts;
mod groups;
mod habits;
mod helpers;
mod public;
