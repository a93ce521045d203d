//! Shared test helpers for `wooledger-core` integration tests.
//!
//! In-memory implementations of the core ports so tests can focus on
//! behaviour instead of storage.

#![allow(dead_code)]

pub mod ledger;
pub mod remote;

use wooledger_domain::{ApiSecret, ConnectionSettings, VerifyDirective};

/// Settings snapshot pointing at a fictional store.
pub fn connection_settings() -> ConnectionSettings {
    ConnectionSettings {
        base_url: "https://shop.example".to_string(),
        api_key: "ck_test".to_string(),
        api_secret: ApiSecret::new("cs_test"),
        verify: VerifyDirective::Secure,
        last_sync: None,
        sync_only_published: false,
    }
}
