/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AUTH_ROUTE_COMPONENT: &str = "auth";
pub const AUTH_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", AUTH_ROUTE_COMPONENT);

pub const HABITS_ROUTE_COMPONENT: &str = "habits";
pub const HABITS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", HABITS_ROUTE_COMPONENT);

pub const HABIT_ENTRIES_ROUTE_COMPONENT: &str = "habit-entries";
pub const HABIT_ENTRIES_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", HABIT_ENTRIES_ROUTE_COMPONENT);

pub const GROUPS_ROUTE_COMPONENT: &str = "groups";
pub const GROUPS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", GROUPS_ROUTE_COMPONENT);

/// Auth source recorded on `auth_user` rows that hold an Argon2 password hash.
pub const PASSWORD_AUTH_SOURCE: &str = "password";

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Colour given to habits created without one.
pub const DEFAULT_HABIT_COLOR: &str = "#3B82F6";

/// Number of recent entries embedded in each habit of the habit listing.
pub const RECENT_ENTRY_LIMIT: usize = 30;
