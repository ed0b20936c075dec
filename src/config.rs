//! Connection and client configuration.
//!
//! Both configs can be built by hand or loaded from the environment (a `.env`
//! file is honoured through `dotenvy`). Nothing in the library reads the
//! environment implicitly; the resulting handles are passed in explicitly.

use std::{env, time::Duration};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::{NetworkError, PersistenceError};

/// Database URL used when neither `ACTIVITY_DATABASE_URL` nor `DATABASE_URL`
/// is set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://activity.db?mode=rwc";

/// Base URL used when `API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Settings for the store connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Log every statement through `tracing`.
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            sqlx_logging: false,
        }
    }

    /// Load from `ACTIVITY_DATABASE_URL`, then `DATABASE_URL`, then the default.
    ///
    /// `ACTIVITY_DB_MAX_CONNECTIONS` overrides the pool size.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let url = env::var("ACTIVITY_DATABASE_URL")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let config = Self::new(url);
        match env::var("ACTIVITY_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            Some(max) => config.with_max_connections(max),
            None => config,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self.min_connections = self.min_connections.min(max_connections);
        self
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(self.sqlx_logging);
        opt
    }

    /// Open the connection pool.
    pub async fn connect(&self) -> Result<DatabaseConnection, PersistenceError> {
        info!(max_connections = self.max_connections, "connecting to activity store");
        Ok(Database::connect(self.connect_options()).await?)
    }
}

/// Settings shared by the HTTP clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and authority of the API, without the `/api` prefix.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load from `API_BASE_URL` and `API_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        if let Ok(base_url) = env::var("API_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = env::var("API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `base_url` joined with `path`, tolerating a trailing slash on the base.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, NetworkError> {
        Ok(reqwest::Client::builder().timeout(self.timeout).build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = ClientConfig::new("http://localhost:9000/");
        assert_eq!(
            config.endpoint("/api/validation/status"),
            "http://localhost:9000/api/validation/status"
        );
    }

    #[test]
    fn env_pool_size_clamps_minimum() {
        env::set_var("ACTIVITY_DB_MAX_CONNECTIONS", "1");
        let config = DatabaseConfig::from_env();
        env::remove_var("ACTIVITY_DB_MAX_CONNECTIONS");

        assert_eq!(config.max_connections, 1);
        assert_eq!(config.min_connections, 1);
    }

    #[test]
    fn max_connections_clamps_minimum() {
        let config = DatabaseConfig::new("sqlite::memory:").with_max_connections(1);
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.min_connections, 1);
    }
}
