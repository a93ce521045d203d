//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDateTime;
use keyring::mock::MockCredential;
use keyring::Entry;
use serde_json::{json, Value};
use tempfile::TempDir;
use wooledger_core::SettingsProvider;
use wooledger_domain::{ApiSecret, HttpConfig, SettingsRecord, SyncLogEntry};
use wooledger_infra::database::{
    DbManager, SqliteInvoiceRepository, SqliteSettingsStore, SqliteSyncLogRepository,
};
use wooledger_infra::{KeyringSecretStore, WooCommerceCatalog, WooCommerceClient};

pub const API_KEY: &str = "ck_test";
pub const API_SECRET: &str = "cs_very_secret";

/// Migrated SQLite database in a temporary directory, kept alive for the
/// duration of a test.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(temp_dir.path().join("ledger.db"), 4)
            .expect("db manager should be created");
        manager.run_migrations().expect("migrations should apply");
        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// A connector wired against `base_url` with SQLite stores and a mock
/// keychain entry holding [`API_SECRET`].
pub struct Connector {
    pub db: TestDatabase,
    pub settings_store: Arc<SqliteSettingsStore>,
    pub sync_log: Arc<SqliteSyncLogRepository>,
    pub invoices: Arc<SqliteInvoiceRepository>,
    pub provider: Arc<SettingsProvider>,
    pub client: Arc<WooCommerceClient>,
}

impl Connector {
    pub async fn new(base_url: &str) -> Self {
        Self::with_record(settings_record(base_url, None, false)).await
    }

    pub async fn with_record(record: SettingsRecord) -> Self {
        Self::with_http(record, short_timeouts()).await
    }

    pub async fn with_http(record: SettingsRecord, http: HttpConfig) -> Self {
        let db = TestDatabase::new();
        let settings_store = Arc::new(SqliteSettingsStore::new(db.manager.clone()));
        settings_store.save(&record).await.expect("settings saved");

        let secrets = mock_secrets();
        secrets.store_secret(&ApiSecret::new(API_SECRET)).expect("secret stored");

        let sync_log = Arc::new(SqliteSyncLogRepository::new(db.manager.clone()));
        let invoices = Arc::new(SqliteInvoiceRepository::new(db.manager.clone()));
        let provider = Arc::new(SettingsProvider::new(settings_store.clone(), Arc::new(secrets)));
        let client = Arc::new(WooCommerceClient::new(provider.clone(), sync_log.clone(), http));

        Self { db, settings_store, sync_log, invoices, provider, client }
    }

    pub fn catalog(&self) -> WooCommerceCatalog {
        WooCommerceCatalog::new(self.client.clone())
    }

    /// Every sync log entry, oldest first.
    pub async fn log_entries(&self) -> Vec<SyncLogEntry> {
        use wooledger_core::SyncLogSink;

        let mut entries = self.sync_log.recent(100).await.expect("sync log readable");
        entries.reverse();
        entries
    }
}

pub fn settings_record(
    base_url: &str,
    last_sync: Option<NaiveDateTime>,
    sync_only_published: bool,
) -> SettingsRecord {
    SettingsRecord {
        woocommerce_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
        verify_ssl: Some(json!(1)),
        last_sync_datetime: last_sync,
        sync_only_published,
    }
}

pub fn mock_secrets() -> KeyringSecretStore {
    KeyringSecretStore::with_entry(Entry::new_with_credential(Box::new(MockCredential::default())))
}

pub fn short_timeouts() -> HttpConfig {
    HttpConfig {
        fetch_timeout_secs: 5,
        create_timeout_secs: 5,
        replace_timeout_secs: 5,
        delete_timeout_secs: 5,
        ..HttpConfig::default()
    }
}

/// `count` product-like records with ids starting at `first_id`.
pub fn products(first_id: u64, count: u64) -> Value {
    Value::Array(
        (first_id..first_id + count)
            .map(|id| json!({ "id": id, "name": format!("Product {id}") }))
            .collect(),
    )
}
