//! Audit entries written for failed remote calls and reconciliation
//! transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Info,
    Warning,
    Error,
}

impl_domain_status_conversions!(LogSeverity {
    Info => "info",
    Warning => "warning",
    Error => "error",
});

/// Append-only audit record. `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub severity: LogSeverity,
    pub method: String,
    pub message: String,
    pub request_data: Value,
    pub exception: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SyncLogEntry {
    /// Error entry with the exception flag set.
    pub fn error(
        title: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
        request_data: Value,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            severity: LogSeverity::Error,
            method: method.into(),
            message: message.into(),
            request_data,
            exception: true,
            created_at: None,
        }
    }

    pub fn info(
        title: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
        request_data: Value,
    ) -> Self {
        Self {
            severity: LogSeverity::Info,
            exception: false,
            ..Self::error(title, method, message, request_data)
        }
    }
}
