//! API secret storage using the system keyring
use std::sync::Arc;

use async_trait::async_trait;
use keyring::Entry;
use tokio::task;
use tracing::debug;
use wooledger_core::SecretAccessor;
use wooledger_domain::constants::{KEYRING_SECRET_KEY, KEYRING_SERVICE};
use wooledger_domain::{ApiSecret, Result, WooLedgerError};

use crate::errors::InfraError;

/// Keeps the WooCommerce consumer secret out of the settings table
pub struct KeyringSecretStore {
    entry: Arc<Entry>,
}

impl KeyringSecretStore {
    /// Open the connector's keyring entry
    pub fn new() -> Result<Self> {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_SECRET_KEY)
            .map_err(|e| WooLedgerError::Security(format!("Failed to access keyring: {}", e)))?;
        Ok(Self::with_entry(entry))
    }

    /// Use a pre-built entry (e.g. a mock credential in tests)
    pub fn with_entry(entry: Entry) -> Self {
        Self { entry: Arc::new(entry) }
    }

    /// Store or replace the secret
    pub fn store_secret(&self, secret: &ApiSecret) -> Result<()> {
        self.entry.set_password(secret.expose()).map_err(|e| WooLedgerError::from(InfraError::from(e)))
    }

    /// Delete the stored secret (use with caution!)
    pub fn delete_secret(&self) -> Result<()> {
        self.entry.delete_credential().map_err(|e| WooLedgerError::from(InfraError::from(e)))
    }
}

#[async_trait]
impl SecretAccessor for KeyringSecretStore {
    async fn api_secret(&self) -> Result<Option<ApiSecret>> {
        // Platform backends block on D-Bus or the Keychain.
        let entry = Arc::clone(&self.entry);
        let lookup = task::spawn_blocking(move || entry.get_password()).await.map_err(|err| {
            WooLedgerError::Internal(format!("keyring lookup task failed: {err}"))
        })?;

        match lookup {
            Ok(secret) => Ok(Some(ApiSecret::new(secret))),
            Err(keyring::Error::NoEntry) => {
                debug!("no API secret stored in keyring");
                Ok(None)
            }
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}
