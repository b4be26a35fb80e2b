use std::time::Duration;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use keyforge_application::JwtConfig;
use secrecy::Secret;
use serde::Deserialize;

/// Process configuration. Loaded once at startup and handed to components
/// as explicit structs; nothing reads configuration ambiently.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub email: EmailSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
    pub reset_ttl_seconds: i64,
}

impl JwtSettings {
    pub fn to_jwt_config(&self) -> JwtConfig {
        JwtConfig {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            signing_key: self.secret.clone(),
            access_ttl_seconds: self.access_ttl_seconds,
            refresh_ttl_seconds: self.refresh_ttl_seconds,
            reset_ttl_seconds: self.reset_ttl_seconds,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender: String,
    pub authorization_token: Secret<String>,
    pub timeout_millis: u64,
    pub reset_base_url: String,
}

impl EmailSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

impl Settings {
    /// Layered load: built-in defaults, then an optional `configuration`
    /// file in the working directory, then `KEYFORGE__`-prefixed
    /// environment variables (e.g. `KEYFORGE__JWT__SECRET`).
    pub fn load() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::with_prefix("KEYFORGE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8080)?
        .set_default("database.max_connections", 5)?
        .set_default("jwt.issuer", "https://keyforge.dev")?
        .set_default("jwt.audience", "keyforge")?
        .set_default("jwt.access_ttl_seconds", 900)?
        .set_default("jwt.refresh_ttl_seconds", 2_592_000)?
        .set_default("jwt.reset_ttl_seconds", 1800)?
        .set_default("email.base_url", "https://api.postmarkapp.com/")?
        .set_default("email.timeout_millis", 10_000)?
        .set_default(
            "email.reset_base_url",
            "http://localhost:8080/reset-password?token=",
        )
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn settings_from(overrides: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let mut builder = defaults().unwrap();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build()?.try_deserialize()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("database.url", "postgres://localhost/keyforge"),
            ("jwt.secret", "super-secret"),
            ("email.sender", "noreply@example.com"),
            ("email.authorization_token", "postmark-token"),
        ]
    }

    #[test]
    fn defaults_fill_everything_but_the_secrets() {
        let settings = settings_from(&required()).unwrap();
        assert_eq!(settings.application.port, 8080);
        assert_eq!(settings.jwt.reset_ttl_seconds, 1800);
        assert_eq!(settings.jwt.secret.expose_secret(), "super-secret");
        assert_eq!(settings.email.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn missing_secret_fails_the_load() {
        let mut overrides = required();
        overrides.retain(|(key, _)| *key != "jwt.secret");
        assert!(settings_from(&overrides).is_err());
    }

    #[test]
    fn jwt_settings_convert_to_codec_config() {
        let settings = settings_from(&required()).unwrap();
        let jwt_config = settings.jwt.to_jwt_config();
        assert_eq!(jwt_config.issuer, settings.jwt.issuer);
        assert_eq!(jwt_config.access_ttl_seconds, 900);
    }
}
