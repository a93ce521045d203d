//! Scripted `RemoteApi` and in-memory `SyncLogSink`.

use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use wooledger_core::{RemoteApi, SyncLogSink};
use wooledger_domain::{
    ConnectionSettings, RemoteResponse, Result as DomainResult, SyncLogEntry, WooLedgerError,
};

/// Builds a 200 response carrying `records` and an optional page count.
pub fn page(records: Vec<Value>, total_pages: Option<&str>) -> RemoteResponse {
    let mut headers = BTreeMap::new();
    if let Some(total) = total_pages {
        headers.insert("x-wp-totalpages".to_string(), total.to_string());
    }
    RemoteResponse {
        status: 200,
        url: String::new(),
        headers,
        body: serde_json::to_vec(&Value::Array(records)).unwrap(),
    }
}

pub fn records(count: usize, offset: usize) -> Vec<Value> {
    (offset..offset + count).map(|id| serde_json::json!({ "id": id })).collect()
}

/// Replays queued responses in order and records every requested path.
#[derive(Default)]
pub struct ScriptedRemote {
    responses: Mutex<VecDeque<DomainResult<RemoteResponse>>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedRemote {
    pub fn new(responses: Vec<DomainResult<RemoteResponse>>) -> Self {
        Self { responses: Mutex::new(responses.into()), requested: Mutex::default() }
    }

    pub async fn requested_paths(&self) -> Vec<String> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl RemoteApi for ScriptedRemote {
    async fn fetch_with(
        &self,
        path: &str,
        _settings: &ConnectionSettings,
    ) -> DomainResult<RemoteResponse> {
        self.requested.lock().await.push(path.to_string());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(WooLedgerError::Internal(format!("unexpected fetch of {path}"))))
    }
}

/// Collects entries in memory; can be told to fail every write.
#[derive(Default)]
pub struct MemorySyncLog {
    entries: Mutex<Vec<SyncLogEntry>>,
    fail_writes: bool,
}

impl MemorySyncLog {
    pub fn failing() -> Self {
        Self { entries: Mutex::default(), fail_writes: true }
    }

    pub async fn entries(&self) -> Vec<SyncLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl SyncLogSink for MemorySyncLog {
    async fn record(&self, entry: SyncLogEntry) -> DomainResult<i64> {
        if self.fail_writes {
            return Err(WooLedgerError::Database("sync_log is read-only".into()));
        }
        let mut entries = self.entries.lock().await;
        entries.push(entry);
        Ok(entries.len() as i64)
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<SyncLogEntry>> {
        Ok(self.entries.lock().await.iter().rev().take(limit).cloned().collect())
    }
}
