use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings shared by every service: listen port and observability.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Read an environment variable, falling back to `default` outside production.
///
/// In production (`is_prod`) every variable must be set explicitly.
pub fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match std::env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Parse an environment variable into `T`, using `default` when unset.
pub fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val.parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

/// `ENVIRONMENT=prod` switches services into strict configuration mode.
pub fn is_production() -> bool {
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_env_uses_default_outside_production() {
        let value = get_env("SERVICE_CORE_TEST_UNSET_VARIABLE", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn get_env_requires_value_in_production() {
        let result = get_env("SERVICE_CORE_TEST_UNSET_VARIABLE", Some("fallback"), true);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn parse_env_falls_back_when_unset() {
        let port: u16 = parse_env("SERVICE_CORE_TEST_UNSET_PORT", 4000).unwrap();
        assert_eq!(port, 4000);
    }
}
