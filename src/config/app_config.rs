use std::{env, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

const DEFAULT_ALLOWED_ORIGINS: &str = "https://jumek-alpha-inventory.vercel.app,https://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::ConfigError(format!(
                "Invalid STORAGE_BACKEND value: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Required only when the Postgres backend is selected.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub statement_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage: StorageBackend = var("STORAGE_BACKEND", "postgres").parse()?;
        let url = lookup("DB_URL").filter(|url| !url.trim().is_empty());

        if storage == StorageBackend::Postgres && url.is_none() {
            return Err(AppError::ConfigError(
                "DB_URL must be set when STORAGE_BACKEND is postgres".to_string(),
            ));
        }

        let allowed_origins: Vec<String> = var("FRONTEND_URL", DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // credentialed CORS cannot answer with a wildcard origin
        if allowed_origins.iter().any(|origin| origin == "*") {
            return Err(AppError::ConfigError(
                "FRONTEND_URL must list explicit origins, not *".to_string(),
            ));
        }

        Ok(Self {
            server: ServerConfig {
                host: var("HOST", "0.0.0.0"),
                port: parse_value("PORT", &var("PORT", "5000"))?,
                max_body_size: parse_value("MAX_BODY_SIZE", &var("MAX_BODY_SIZE", "1048576"))?,
            },
            storage,
            database: DatabaseConfig {
                url,
                max_connections: parse_value(
                    "DB_MAX_CONNECTIONS",
                    &var("DB_MAX_CONNECTIONS", "10"),
                )?,
                connect_timeout: Duration::from_secs(parse_value(
                    "DB_CONNECT_TIMEOUT_SECS",
                    &var("DB_CONNECT_TIMEOUT_SECS", "10"),
                )?),
                statement_timeout: Duration::from_secs(parse_value(
                    "DB_STATEMENT_TIMEOUT_SECS",
                    &var("DB_STATEMENT_TIMEOUT_SECS", "45"),
                )?),
            },
            cors: CorsConfig { allowed_origins },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value", key)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn memory_backend_needs_no_database_url() {
        let config = config_from(&[("STORAGE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server_address(), "0.0.0.0:5000");
        assert_eq!(config.database.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.database.statement_timeout, Duration::from_secs(45));
        assert_eq!(
            config.cors.allowed_origins,
            vec![
                "https://jumek-alpha-inventory.vercel.app".to_string(),
                "https://localhost:3000".to_string(),
            ]
        );
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let config = config_from(&[("DB_URL", "postgres://localhost/inventory")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/inventory")
        );
    }

    #[test]
    fn rejects_malformed_numbers_and_backends() {
        let err = config_from(&[("STORAGE_BACKEND", "memory"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = config_from(&[("STORAGE_BACKEND", "mongo")]).unwrap_err();
        assert!(err.to_string().contains("STORAGE_BACKEND"));
    }

    #[test]
    fn rejects_wildcard_origin() {
        let err = config_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("FRONTEND_URL", "https://a.example, *"),
        ])
        .unwrap_err();

        assert!(matches!(err, AppError::ConfigError(ref msg) if msg.contains("FRONTEND_URL")));
    }

    #[test]
    fn splits_and_trims_origin_list() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("FRONTEND_URL", " https://a.example , https://b.example ,"),
        ])
        .unwrap();

        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}
