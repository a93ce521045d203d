//! Builds the immutable [`ConnectionSettings`] snapshot used by a sync run.

use std::sync::Arc;

use tracing::{debug, warn};
use wooledger_domain::{ConnectionSettings, Result, WooLedgerError};

use super::normalizer::normalize_verify;
use super::ports::{SecretAccessor, SettingsStore};

const MISSING_URL: &str = "WooCommerce store URL is not configured";
const MISSING_SECRET: &str = "WooCommerce API secret is not configured";

/// Loads settings and resolves the API secret.
pub struct SettingsProvider {
    store: Arc<dyn SettingsStore>,
    secrets: Arc<dyn SecretAccessor>,
}

impl SettingsProvider {
    pub fn new(store: Arc<dyn SettingsStore>, secrets: Arc<dyn SecretAccessor>) -> Self {
        Self { store, secrets }
    }

    /// Produce a fresh snapshot.
    ///
    /// # Errors
    ///
    /// [`WooLedgerError::Config`] when no record exists, the store URL is
    /// blank, or no API secret has been stored. These are not retried.
    pub async fn load(&self) -> Result<ConnectionSettings> {
        let record = self.store.load().await?.ok_or_else(|| {
            warn!("connector settings record is missing");
            WooLedgerError::Config(MISSING_URL.to_string())
        })?;

        let base_url = record.woocommerce_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            warn!("connector settings have an empty store URL");
            return Err(WooLedgerError::Config(MISSING_URL.to_string()));
        }

        let api_secret = self
            .secrets
            .api_secret()
            .await?
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| WooLedgerError::Config(MISSING_SECRET.to_string()))?;

        let verify = normalize_verify(record.verify_ssl.as_ref());
        debug!(base_url = %base_url, verify = ?verify, "loaded connection settings");

        Ok(ConnectionSettings {
            base_url,
            api_key: record.api_key,
            api_secret,
            verify,
            last_sync: record.last_sync_datetime,
            sync_only_published: record.sync_only_published,
        })
    }
}
