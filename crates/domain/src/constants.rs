//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! connector.

// Remote REST API
pub const REST_API_PREFIX: &str = "wp-json";
pub const REST_API_VERSION: &str = "wc/v3";
pub const PAGE_SIZE: u32 = 100;
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";
pub const CONSUMER_KEY_PARAM: &str = "consumer_key";
pub const CONSUMER_SECRET_PARAM: &str = "consumer_secret";

// HTTP timeouts (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 1000;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 1000;
pub const DEFAULT_REPLACE_TIMEOUT_SECS: u64 = 5000;
pub const DEFAULT_USER_AGENT: &str = concat!("wooledger/", env!("CARGO_PKG_VERSION"));

// Logging placeholders
pub const NO_BODY_PLACEHOLDER: &str = "<no-body>";
pub const REDACTED: &str = "***";

// Reconciliation
pub const DEFAULT_RECONCILE_CRON: &str = "0 */15 * * * *";
pub const RECONCILE_METHOD: &str = "auto_reconcile_payments";

// Document types understood by the whitelisted services
pub const SALES_INVOICE_DOCTYPE: &str = "Sales Invoice";

// Secret storage
pub const KEYRING_SERVICE: &str = "com.wooledger.connector";
pub const KEYRING_SECRET_KEY: &str = "api_secret";
