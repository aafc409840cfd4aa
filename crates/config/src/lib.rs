use dotenv::dotenv;
use dotenv::from_path;
use std::collections::HashMap;
use std::env;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_DATABASE_URL: &str = "postdesk.db";
pub const DEFAULT_POOL_SIZE: u32 = 8;
pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 8000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load .env file from path {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Which origins the HTTP layer accepts. `*` in the environment means any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AllowAll,
    AllowOrigins(Vec<String>),
}

impl CorsPolicy {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ALLOWED_ORIGINS".to_string(),
                reason: "no origins given (use * to allow any)".to_string(),
            });
        }
        if origins.iter().any(|origin| origin == "*") {
            return Ok(CorsPolicy::AllowAll);
        }
        Ok(CorsPolicy::AllowOrigins(origins))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_pool_size: u32,
    pub api_host: String,
    pub api_port: u16,
    pub cors: CorsPolicy,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file,
    /// then read the process environment.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else if let Err(e) = dotenv() {
            warn!("Could not load .env file: {}", e);
        }

        Self::from_vars(&env::vars().collect())
    }

    /// Build from an explicit variable map; missing keys fall back to defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(String::as_str);

        let database_pool_size = match get("DATABASE_POOL_SIZE") {
            Some(raw) => parse_value::<u32>("DATABASE_POOL_SIZE", raw)?,
            None => DEFAULT_POOL_SIZE,
        };
        if database_pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DATABASE_POOL_SIZE".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Config {
            database_url: get("DATABASE_URL")
                .unwrap_or(DEFAULT_DATABASE_URL)
                .to_string(),

            database_pool_size,

            api_host: get("API_HOST").unwrap_or(DEFAULT_API_HOST).to_string(),

            api_port: match get("API_PORT") {
                Some(raw) => parse_value("API_PORT", raw)?,
                None => DEFAULT_API_PORT,
            },

            cors: CorsPolicy::parse(get("CORS_ALLOWED_ORIGINS").unwrap_or("*"))?,
        })
    }

    pub fn print_config(&self) {
        info!("Configuration loaded:");
        info!("  Database: {}", self.database_url);
        info!("  Pool size: {}", self.database_pool_size);
        info!("  API Server: {}", self.api_address());
        match &self.cors {
            CorsPolicy::AllowAll => info!("  CORS: any origin"),
            CorsPolicy::AllowOrigins(origins) => info!("  CORS: {}", origins.join(", ")),
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_vars(&HashMap::new()).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database_pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.api_address(), "127.0.0.1:8000");
        assert_eq!(config.cors, CorsPolicy::AllowAll);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_vars(&vars(&[
            ("DATABASE_URL", "/var/lib/postdesk/articles.db"),
            ("DATABASE_POOL_SIZE", "2"),
            ("API_HOST", "0.0.0.0"),
            ("API_PORT", " 9090 "),
            (
                "CORS_ALLOWED_ORIGINS",
                "https://blog.example.com, https://admin.example.com",
            ),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "/var/lib/postdesk/articles.db");
        assert_eq!(config.database_pool_size, 2);
        assert_eq!(config.api_address(), "0.0.0.0:9090");
        assert_eq!(
            config.cors,
            CorsPolicy::AllowOrigins(vec![
                "https://blog.example.com".to_string(),
                "https://admin.example.com".to_string(),
            ])
        );
    }

    #[test]
    fn wildcard_anywhere_in_the_list_allows_all() {
        let config =
            Config::from_vars(&vars(&[("CORS_ALLOWED_ORIGINS", "https://a.example, *")])).unwrap();
        assert_eq!(config.cors, CorsPolicy::AllowAll);
    }

    #[test]
    fn rejects_bad_numbers_and_empty_origins() {
        assert!(matches!(
            Config::from_vars(&vars(&[("API_PORT", "http")])),
            Err(ConfigError::InvalidValue { key, .. }) if key == "API_PORT"
        ));
        assert!(Config::from_vars(&vars(&[("API_PORT", "70000")])).is_err());
        assert!(Config::from_vars(&vars(&[("DATABASE_POOL_SIZE", "0")])).is_err());
        assert!(Config::from_vars(&vars(&[("CORS_ALLOWED_ORIGINS", " , ")])).is_err());
    }
}
