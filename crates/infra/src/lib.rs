//! # WooLedger Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - SQLite storage for connector settings, the sync log and the local ledger
//! - The WooCommerce REST client and catalog reads
//! - OS keychain access for the API secret
//! - The cron scheduler that drives payment reconciliation
//!
//! ## Architecture
//! - Implements traits defined in `wooledger-core`
//! - Contains all "impure" code (I/O, network, keychain)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod key_manager;
pub mod scheduling;
pub mod woocommerce;

pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use key_manager::KeyringSecretStore;
pub use scheduling::{ReconcileScheduler, ReconcileSchedulerConfig, SchedulerError};
pub use woocommerce::{WooCommerceCatalog, WooCommerceClient};
