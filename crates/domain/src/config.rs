//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_RECONCILE_CRON, DEFAULT_REPLACE_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, DEFAULT_WRITE_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Per-verb timeouts and client identity for the remote REST API.
///
/// Values are in seconds. Replace (PUT) calls get the longest budget because
/// the remote platform re-indexes products synchronously on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub fetch_timeout_secs: u64,
    pub create_timeout_secs: u64,
    pub replace_timeout_secs: u64,
    pub delete_timeout_secs: u64,
    pub user_agent: String,
}

impl HttpConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    pub fn replace_timeout(&self) -> Duration {
        Duration::from_secs(self.replace_timeout_secs)
    }

    pub fn delete_timeout(&self) -> Duration {
        Duration::from_secs(self.delete_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            create_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            replace_timeout_secs: DEFAULT_REPLACE_TIMEOUT_SECS,
            delete_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Payment auto-reconciliation schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    pub job_timeout_secs: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_expression: DEFAULT_RECONCILE_CRON.to_string(),
            job_timeout_secs: 300,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "wooledger.db".to_string(), pool_size: 4 },
            http: HttpConfig::default(),
            reconcile: ReconcileConfig::default(),
        }
    }
}
