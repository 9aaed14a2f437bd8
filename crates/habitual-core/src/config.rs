use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::DEFAULT_HABIT_COLOR;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub habits: HabitsConfig,
    pub avatars: AvatarsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    SingleUser,
    BasicAuth,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    pub single_user: Option<SingleUserAuthConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserAuthConfig {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
    #[serde(default)]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Habit bucketing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitsConfig {
    /// IANA zone name used for day/week/month boundaries; the host zone when unset.
    pub timezone: Option<String>,
    pub default_color: String,
}

impl Default for HabitsConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            default_color: DEFAULT_HABIT_COLOR.to_string(),
        }
    }
}

/// Location of the bundled default avatar images.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarsConfig {
    /// Directory listed by the default avatar endpoint.
    pub default_dir: String,
    /// Public URL prefix the files in `default_dir` are served under. Ends with `/`.
    pub url_prefix: String,
}

impl Default for AvatarsConfig {
    fn default() -> Self {
        Self {
            default_dir: "public/uploads/default_avatar".to_string(),
            url_prefix: "/uploads/default_avatar/".to_string(),
        }
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let habits = HabitsConfig::default();
        let avatars = AvatarsConfig::default();

        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("database.max_connections", 4)?
            .set_default("database.run_migrations", true)?
            .set_default("auth.method", "basic_auth")?
            .set_default("logging.level", "debug")?
            .set_default("habits.default_color", habits.default_color)?
            .set_default("avatars.default_dir", avatars.default_dir)?
            .set_default("avatars.url_prefix", avatars.url_prefix)?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    Settings::load()
}
