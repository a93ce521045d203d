//! SQLite storage for the single connector settings row.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;
use tokio::task;
use tracing::warn;
use wooledger_core::SettingsStore;
use wooledger_domain::{Result as DomainResult, SettingsRecord, WooLedgerError};

use super::manager::{map_join_error, map_sql_error, DbManager, SqliteConnection};

pub struct SqliteSettingsStore {
    db: Arc<DbManager>,
}

impl SqliteSettingsStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or replace the settings row.
    pub async fn save(&self, record: &SettingsRecord) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let record = record.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            Self::upsert(&conn, &record)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Advance the sync cursor after a successful run.
    pub async fn set_last_sync(&self, cursor: NaiveDateTime) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE connector_settings SET last_sync_datetime = ?1 WHERE id = 1",
                    params![format_cursor(cursor)],
                )
                .map_err(map_sql_error)?;
            if updated == 0 {
                return Err(WooLedgerError::NotFound("connector settings row".into()));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    fn upsert(conn: &SqliteConnection, record: &SettingsRecord) -> DomainResult<()> {
        let verify_ssl = record
            .verify_ssl
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|err| WooLedgerError::InvalidInput(format!("verify_ssl: {err}")))?;

        conn.execute(
            "INSERT INTO connector_settings
                (id, woocommerce_url, api_key, verify_ssl, last_sync_datetime, sync_only_published)
             VALUES (1, ?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                woocommerce_url = excluded.woocommerce_url,
                api_key = excluded.api_key,
                verify_ssl = excluded.verify_ssl,
                last_sync_datetime = excluded.last_sync_datetime,
                sync_only_published = excluded.sync_only_published",
            params![
                record.woocommerce_url,
                record.api_key,
                verify_ssl,
                record.last_sync_datetime.map(format_cursor),
                record.sync_only_published,
            ],
        )
        .map(|_| ())
        .map_err(map_sql_error)
    }

    fn fetch(conn: &SqliteConnection) -> DomainResult<Option<SettingsRecord>> {
        conn.query_row(
            "SELECT woocommerce_url, api_key, verify_ssl, last_sync_datetime, sync_only_published
             FROM connector_settings WHERE id = 1",
            [],
            map_settings_row,
        )
        .optional()
        .map_err(map_sql_error)
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn load(&self) -> DomainResult<Option<SettingsRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<SettingsRecord>> {
            let conn = db.get_connection()?;
            Self::fetch(&conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_settings_row(row: &Row<'_>) -> rusqlite::Result<SettingsRecord> {
    let verify_raw: Option<String> = row.get(2)?;
    let cursor_raw: Option<String> = row.get(3)?;

    Ok(SettingsRecord {
        woocommerce_url: row.get(0)?,
        api_key: row.get(1)?,
        verify_ssl: verify_raw.map(|raw| parse_verify(&raw)),
        last_sync_datetime: cursor_raw.as_deref().and_then(parse_cursor),
        sync_only_published: row.get(4)?,
    })
}

/// Stored values are JSON; anything else is what an operator typed by hand.
fn parse_verify(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn format_cursor(cursor: NaiveDateTime) -> String {
    cursor.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn parse_cursor(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    match normalized.parse::<NaiveDateTime>() {
        Ok(cursor) => Some(cursor),
        Err(err) => {
            warn!(raw_cursor = %raw, error = %err, "unreadable last sync timestamp, ignoring");
            None
        }
    }
}
