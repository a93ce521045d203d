//! Connector settings as persisted and as handed to a sync run.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The raw `connector_settings` row.
///
/// `verify_ssl` is kept exactly as stored (absent, boolean, integer, string,
/// or anything else an operator typed in) and is only interpreted when a
/// [`ConnectionSettings`] snapshot is built. The API secret lives in the
/// secret store, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SettingsRecord {
    pub woocommerce_url: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_datetime: Option<NaiveDateTime>,
    #[serde(default)]
    pub sync_only_published: bool,
}

/// How the transport should treat server certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "path", rename_all = "snake_case")]
pub enum VerifyDirective {
    /// Verify against the platform trust store.
    Secure,
    /// Skip certificate verification entirely.
    Insecure,
    /// Verify against the CA bundle at this path.
    CustomBundle(PathBuf),
}

/// API consumer secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(String);

impl ApiSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret value, for building authenticated requests only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret(***)")
    }
}

impl fmt::Display for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::constants::REDACTED)
    }
}

/// Immutable snapshot of everything a sync run needs to talk to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: ApiSecret,
    pub verify: VerifyDirective,
    pub last_sync: Option<NaiveDateTime>,
    pub sync_only_published: bool,
}
