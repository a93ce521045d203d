//! Port interfaces for sync operations

use async_trait::async_trait;
use wooledger_domain::{ConnectionSettings, RemoteResponse, Result, SyncLogEntry};

/// Read access to the remote REST API
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// GET `path` (relative to the versioned API root) with the given
    /// settings snapshot.
    ///
    /// Non-2xx statuses are returned as data, after being written to the
    /// sync log. Only transport failures are errors.
    async fn fetch_with(
        &self,
        path: &str,
        settings: &ConnectionSettings,
    ) -> Result<RemoteResponse>;
}

/// Append-only audit log for remote failures and reconciliation transitions
#[async_trait]
pub trait SyncLogSink: Send + Sync {
    /// Persist an entry, returning its id
    async fn record(&self, entry: SyncLogEntry) -> Result<i64>;

    /// Most recent entries, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<SyncLogEntry>>;
}
