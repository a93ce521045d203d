//! Conversions from storage, keyring and transport errors into
//! [`WooLedgerError`].
//!
//! Non-accepted HTTP statuses never reach this module: the WooCommerce client
//! returns them as data. Only transport-level reqwest failures are mapped.

use std::error::Error as StdError;

use rusqlite::ffi::ErrorCode;
use wooledger_domain::WooLedgerError;

/// Newtype that keeps third-party error conversions on the infrastructure
/// side of the workspace.
#[derive(Debug)]
pub struct InfraError(pub WooLedgerError);

impl From<InfraError> for WooLedgerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WooLedgerError> for InfraError {
    fn from(value: WooLedgerError) -> Self {
        InfraError(value)
    }
}

impl From<rusqlite::Error> for InfraError {
    fn from(err: rusqlite::Error) -> Self {
        let mapped = match err {
            rusqlite::Error::SqliteFailure(failure, detail) => {
                let detail = detail.unwrap_or_else(|| failure.to_string());
                match failure.code {
                    ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                        WooLedgerError::Database(format!("ledger database unavailable: {detail}"))
                    }
                    ErrorCode::ConstraintViolation => {
                        WooLedgerError::Database(format!("constraint violation: {detail}"))
                    }
                    ErrorCode::NotADatabase => WooLedgerError::Config(format!(
                        "configured database path is not a SQLite file: {detail}"
                    )),
                    _ => WooLedgerError::Database(detail),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => {
                WooLedgerError::NotFound("no matching ledger row".into())
            }
            other => WooLedgerError::Database(other.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(WooLedgerError::Database(format!("no pooled connection available: {err}")))
    }
}

impl From<keyring::Error> for InfraError {
    fn from(err: keyring::Error) -> Self {
        let mapped = match err {
            keyring::Error::NoEntry => {
                WooLedgerError::NotFound("no API secret stored in keyring".into())
            }
            keyring::Error::BadEncoding(_) => {
                WooLedgerError::Security("stored API secret is not valid UTF-8".into())
            }
            keyring::Error::NoStorageAccess(cause) => {
                WooLedgerError::Security(format!("keyring is not reachable: {cause}"))
            }
            other => WooLedgerError::Security(format!("keyring failure: {other}")),
        };
        InfraError(mapped)
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the consumer secret in their query string.
        let err = err.without_url();
        let mapped = if err.is_timeout() {
            WooLedgerError::Network("request timed out".into())
        } else if err.is_connect() {
            WooLedgerError::Network(format!("connection failed: {}", root_cause(&err)))
        } else if err.is_builder() {
            WooLedgerError::Config(format!("invalid request: {}", root_cause(&err)))
        } else if err.is_body() || err.is_decode() {
            WooLedgerError::Network(format!("failed to read response body: {}", root_cause(&err)))
        } else {
            WooLedgerError::Network(root_cause(&err))
        };
        InfraError(mapped)
    }
}

fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
