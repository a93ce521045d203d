//! Port interfaces for connector settings

use async_trait::async_trait;
use wooledger_domain::{ApiSecret, Result, SettingsRecord};

/// Storage for the single connector settings record
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the settings record, if one has been saved
    async fn load(&self) -> Result<Option<SettingsRecord>>;
}

/// Secure storage for the API consumer secret
#[async_trait]
pub trait SecretAccessor: Send + Sync {
    /// Retrieve the API secret, `None` when it has never been stored
    async fn api_secret(&self) -> Result<Option<ApiSecret>>;
}
