//! Application context - dependency injection container

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use wooledger_core::{ReconciliationService, SecretAccessor, SettingsProvider, SyncLogSink};
use wooledger_domain::{Config, Result, WooLedgerError};
use wooledger_infra::{
    DbManager, KeyringSecretStore, ReconcileScheduler, ReconcileSchedulerConfig,
    SqliteInvoiceRepository, SqliteModeOfPaymentRepository, SqliteSettingsStore,
    SqliteSyncLogRepository, WooCommerceCatalog, WooCommerceClient,
};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,

    // Stores
    pub settings_store: Arc<SqliteSettingsStore>,
    pub sync_log: Arc<SqliteSyncLogRepository>,
    pub invoices: Arc<SqliteInvoiceRepository>,
    pub mode_of_payment: Arc<SqliteModeOfPaymentRepository>,

    // Services
    pub settings: Arc<SettingsProvider>,
    pub client: Arc<WooCommerceClient>,
    pub catalog: Arc<WooCommerceCatalog>,
    pub reconciliation: Arc<ReconciliationService>,

    /// Present only when reconciliation is enabled in the config.
    reconcile_scheduler: Option<ReconcileScheduler>,
}

impl AppContext {
    /// Build the context with the API secret read from the OS keychain.
    ///
    /// Without the `native-keyring` feature the keychain is keyring's
    /// in-memory mock: it starts empty, so every store call fails with
    /// [`WooLedgerError::Config`] until a secret is stored in this process.
    pub fn new(config: Config) -> Result<Self> {
        if !cfg!(feature = "native-keyring") {
            warn!("built without native-keyring; the API secret is not persisted");
        }
        let secrets = Arc::new(KeyringSecretStore::new()?);
        Self::with_secrets(config, secrets)
    }

    /// Build the context with a caller-supplied secret accessor.
    ///
    /// Opens (and migrates) the database; no network traffic happens here.
    pub fn with_secrets(config: Config, secrets: Arc<dyn SecretAccessor>) -> Result<Self> {
        ensure_parent_dir(Path::new(&config.database.path))?;

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let settings_store = Arc::new(SqliteSettingsStore::new(db.clone()));
        let sync_log = Arc::new(SqliteSyncLogRepository::new(db.clone()));
        let invoices = Arc::new(SqliteInvoiceRepository::new(db.clone()));
        let mode_of_payment = Arc::new(SqliteModeOfPaymentRepository::new(db.clone()));

        let settings = Arc::new(SettingsProvider::new(settings_store.clone(), secrets));
        let log_sink: Arc<dyn SyncLogSink> = sync_log.clone();
        let client = Arc::new(WooCommerceClient::new(
            settings.clone(),
            log_sink.clone(),
            config.http.clone(),
        ));
        let catalog = Arc::new(WooCommerceCatalog::new(client.clone()));
        let reconciliation = Arc::new(ReconciliationService::new(invoices.clone(), log_sink));

        let reconcile_scheduler = if config.reconcile.enabled {
            Some(ReconcileScheduler::with_config(
                ReconcileSchedulerConfig::from(&config.reconcile),
                reconciliation.clone(),
            ))
        } else {
            info!("payment reconciliation disabled by configuration");
            None
        };

        info!(database = %db.path().display(), "application context ready");

        Ok(Self {
            config,
            db,
            settings_store,
            sync_log,
            invoices,
            mode_of_payment,
            settings,
            client,
            catalog,
            reconciliation,
            reconcile_scheduler,
        })
    }

    /// Start background jobs.
    pub async fn start(&mut self) -> Result<()> {
        if let Some(scheduler) = self.reconcile_scheduler.as_mut() {
            scheduler.start().await?;
        }
        Ok(())
    }

    /// Stop background jobs. Safe to call when nothing was started.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(scheduler) = self.reconcile_scheduler.as_mut() {
            if scheduler.is_running() {
                scheduler.stop().await?;
            }
        }
        info!("application context shut down");
        Ok(())
    }

    pub fn is_reconciling(&self) -> bool {
        self.reconcile_scheduler.as_ref().is_some_and(ReconcileScheduler::is_running)
    }
}

fn ensure_parent_dir(db_path: &Path) -> Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            warn!(dir = %parent.display(), "creating database directory");
            fs::create_dir_all(parent).map_err(|e| {
                WooLedgerError::Config(format!(
                    "cannot create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })
        }
        _ => Ok(()),
    }
}
