//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `WOOLEDGER_DB_PATH`: Database file path
//! - `WOOLEDGER_DB_POOL_SIZE`: Connection pool size
//!
//! Optional (defaults from [`HttpConfig`] and [`ReconcileConfig`]):
//! - `WOOLEDGER_HTTP_FETCH_TIMEOUT`, `WOOLEDGER_HTTP_CREATE_TIMEOUT`,
//!   `WOOLEDGER_HTTP_REPLACE_TIMEOUT`, `WOOLEDGER_HTTP_DELETE_TIMEOUT`:
//!   per-verb timeouts in seconds
//! - `WOOLEDGER_HTTP_USER_AGENT`: User-Agent sent to the store
//! - `WOOLEDGER_RECONCILE_ENABLED`: Whether the reconcile job runs
//! - `WOOLEDGER_RECONCILE_CRON`: Six-field cron expression
//! - `WOOLEDGER_RECONCILE_TIMEOUT`: Upper bound for one pass, in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./wooledger.json` or `./wooledger.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use wooledger_domain::{
    Config, DatabaseConfig, HttpConfig, ReconcileConfig, Result, WooLedgerError,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `WooLedgerError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `WooLedgerError::Config` if required variables are missing
/// or any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("WOOLEDGER_DB_PATH")?;
    let db_pool_size = env_var("WOOLEDGER_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| WooLedgerError::Config(format!("Invalid pool size: {}", e)))
    })?;

    let http_defaults = HttpConfig::default();
    let http = HttpConfig {
        fetch_timeout_secs: env_parse_or(
            "WOOLEDGER_HTTP_FETCH_TIMEOUT",
            http_defaults.fetch_timeout_secs,
        )?,
        create_timeout_secs: env_parse_or(
            "WOOLEDGER_HTTP_CREATE_TIMEOUT",
            http_defaults.create_timeout_secs,
        )?,
        replace_timeout_secs: env_parse_or(
            "WOOLEDGER_HTTP_REPLACE_TIMEOUT",
            http_defaults.replace_timeout_secs,
        )?,
        delete_timeout_secs: env_parse_or(
            "WOOLEDGER_HTTP_DELETE_TIMEOUT",
            http_defaults.delete_timeout_secs,
        )?,
        user_agent: std::env::var("WOOLEDGER_HTTP_USER_AGENT").unwrap_or(http_defaults.user_agent),
    };

    let reconcile_defaults = ReconcileConfig::default();
    let reconcile = ReconcileConfig {
        enabled: env_bool("WOOLEDGER_RECONCILE_ENABLED", reconcile_defaults.enabled),
        cron_expression: std::env::var("WOOLEDGER_RECONCILE_CRON")
            .unwrap_or(reconcile_defaults.cron_expression),
        job_timeout_secs: env_parse_or(
            "WOOLEDGER_RECONCILE_TIMEOUT",
            reconcile_defaults.job_timeout_secs,
        )?,
    };

    Ok(Config { database: DatabaseConfig { path: db_path, pool_size: db_pool_size }, http, reconcile })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `WooLedgerError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WooLedgerError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WooLedgerError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WooLedgerError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WooLedgerError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WooLedgerError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(WooLedgerError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Returns the first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("wooledger.json"),
        dir.join("wooledger.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        WooLedgerError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable, using `default` when unset.
fn env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| WooLedgerError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
