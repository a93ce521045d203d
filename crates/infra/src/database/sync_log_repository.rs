//! SQLite-backed implementation of the sync log sink.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde_json::Value;
use tokio::task;
use tracing::warn;
use wooledger_core::SyncLogSink;
use wooledger_domain::{LogSeverity, Result as DomainResult, SyncLogEntry};

use super::manager::{map_join_error, map_sql_error, DbManager, SqliteConnection};

pub struct SqliteSyncLogRepository {
    db: Arc<DbManager>,
}

impl SqliteSyncLogRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    fn insert_entry(conn: &SqliteConnection, entry: &SyncLogEntry) -> DomainResult<i64> {
        let created_at = entry.created_at.unwrap_or_else(Utc::now).timestamp_millis();
        conn.execute(
            "INSERT INTO sync_log (title, severity, method, message, request_data, exception, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.title,
                entry.severity.to_string(),
                entry.method,
                entry.message,
                entry.request_data.to_string(),
                entry.exception,
                created_at,
            ],
        )
        .map_err(map_sql_error)?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch_recent(conn: &SqliteConnection, limit: usize) -> DomainResult<Vec<SyncLogEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = conn
            .prepare(
                "SELECT id, title, severity, method, message, request_data, exception, created_at
                 FROM sync_log ORDER BY id DESC LIMIT ?1",
            )
            .map_err(map_sql_error)?;
        let rows = stmt.query_map(params![limit], map_log_row).map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }
}

#[async_trait]
impl SyncLogSink for SqliteSyncLogRepository {
    async fn record(&self, entry: SyncLogEntry) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            Self::insert_entry(&conn, &entry)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn recent(&self, limit: usize) -> DomainResult<Vec<SyncLogEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<SyncLogEntry>> {
            let conn = db.get_connection()?;
            Self::fetch_recent(&conn, limit)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_log_row(row: &Row<'_>) -> rusqlite::Result<SyncLogEntry> {
    let id: i64 = row.get(0)?;
    let severity_raw: String = row.get(2)?;
    let request_raw: String = row.get(5)?;
    let created_ms: i64 = row.get(7)?;

    Ok(SyncLogEntry {
        id: Some(id),
        title: row.get(1)?,
        severity: parse_severity(id, &severity_raw),
        method: row.get(3)?,
        message: row.get(4)?,
        request_data: serde_json::from_str(&request_raw).unwrap_or(Value::String(request_raw)),
        exception: row.get(6)?,
        created_at: DateTime::from_timestamp_millis(created_ms),
    })
}

fn parse_severity(id: i64, raw: &str) -> LogSeverity {
    match raw.parse::<LogSeverity>() {
        Ok(severity) => severity,
        Err(err) => {
            warn!(
                entry_id = id,
                raw_severity = %raw,
                error = %err,
                "invalid sync log severity, defaulting to error"
            );
            LogSeverity::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    async fn setup_repository() -> (SqliteSyncLogRepository, Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = DbManager::new(temp_dir.path().join("test.db"), 2).expect("manager created");
        manager.run_migrations().expect("migrations applied");
        let manager = Arc::new(manager);
        (SqliteSyncLogRepository::new(Arc::clone(&manager)), manager, temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn record_assigns_ids_and_recent_is_newest_first() {
        let (repo, _manager, _temp_dir) = setup_repository().await;

        let first = repo
            .record(SyncLogEntry::error("WooCommerce GET error 500", "get_request", "a", json!({"path": "products"})))
            .await
            .unwrap();
        let second = repo
            .record(SyncLogEntry::info("Invoice marked Paid", "auto_reconcile_payments", "b", json!({})))
            .await
            .unwrap();
        assert!(second > first);

        let entries = repo.recent(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, Some(second));
        assert_eq!(entries[0].severity, LogSeverity::Info);
        assert_eq!(entries[1].request_data, json!({"path": "products"}));
        assert!(entries[1].exception);
        assert!(entries[1].created_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn recent_respects_limit() {
        let (repo, _manager, _temp_dir) = setup_repository().await;
        for n in 0..3 {
            repo.record(SyncLogEntry::info("t", "m", format!("{n}"), Value::Null)).await.unwrap();
        }

        assert_eq!(repo.recent(2).await.unwrap().len(), 2);
        assert!(repo.recent(0).await.unwrap().is_empty());
    }
}
