use std::env;

use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password_reset: PasswordResetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_expiration_minutes")]
    pub access_expiration_minutes: i64,
    #[serde(default = "default_refresh_expiration_hours")]
    pub refresh_expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordResetConfig {
    #[serde(default = "default_reset_expiration_minutes")]
    pub expiration_minutes: i64,
    /// Origin prepended to the confirm path in reset mails
    pub link_base_url: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_expiration_minutes() -> i64 {
    15
}

fn default_refresh_expiration_hours() -> i64 {
    24 * 30
}

fn default_reset_expiration_minutes() -> i64 {
    30
}

impl JwtConfig {
    pub fn lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: chrono::Duration::minutes(self.access_expiration_minutes),
            refresh: chrono::Duration::hours(self.refresh_expiration_hours),
        }
    }
}

impl PasswordResetConfig {
    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.expiration_minutes)
    }
}

/// Secret shipped in `config/default.toml`; only acceptable outside production.
pub const PLACEHOLDER_JWT_SECRET: &str = "change-me-to-a-secret-of-at-least-32-bytes";

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * `Message` - `RUN_MODE=production` with the placeholder JWT secret
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Self::from_sources(&run_mode, environment())?;
        config.check_secret(&run_mode)?;

        Ok(config)
    }

    fn from_sources(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    fn check_secret(&self, run_mode: &str) -> Result<(), ConfigError> {
        if run_mode == "production" && self.jwt.secret == PLACEHOLDER_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be overridden in production (set JWT__SECRET)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Unprefixed variables, `__` between nesting levels:
/// PASSWORD_RESET__EXPIRATION_MINUTES=10 overrides password_reset.expiration_minutes
fn environment() -> Environment {
    Environment::default().separator("__")
}

#[cfg(test)]
mod tests {
    use config::Map;

    use super::*;

    fn environment_from(vars: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn test_environment_overrides_files() {
        let config = Config::from_sources(
            "test",
            environment_from(&[
                ("DATABASE__URL", "postgres://from-env/db"),
                ("JWT__SECRET", "secret-from-environment-at-least-32-bytes"),
                ("PASSWORD_RESET__EXPIRATION_MINUTES", "10"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.url, "postgres://from-env/db");
        assert_eq!(config.jwt.secret, "secret-from-environment-at-least-32-bytes");
        assert_eq!(config.password_reset.expiration_minutes, 10);
        // Untouched keys still come from config/default.toml
        assert_eq!(config.server.http_port, 8080);
    }

    #[test]
    fn test_placeholder_secret_rejected_in_production() {
        let config = Config::from_sources("test", environment_from(&[])).unwrap();
        assert_eq!(config.jwt.secret, PLACEHOLDER_JWT_SECRET);

        assert!(config.check_secret("development").is_ok());
        assert!(matches!(
            config.check_secret("production"),
            Err(ConfigError::Message(_))
        ));
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let configuration = ConfigBuilder::builder()
            .set_override("database.url", "postgres://localhost/accounts")
            .unwrap()
            .set_override("server.http_port", 8080_i64)
            .unwrap()
            .set_override("jwt.secret", "test-secret")
            .unwrap()
            .set_override("password_reset.link_base_url", "http://localhost:8080")
            .unwrap()
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.access_expiration_minutes, 15);
        assert_eq!(config.jwt.refresh_expiration_hours, 720);
        assert_eq!(config.password_reset.expiration_minutes, 30);
        assert_eq!(config.jwt.lifetimes().access, chrono::Duration::minutes(15));
        assert_eq!(config.password_reset.lifetime(), chrono::Duration::minutes(30));
    }
}
