//! # WooLedger Domain
//!
//! Business domain types and models for the WooCommerce ledger connector.
//!
//! This crate contains:
//! - Connection settings and the TLS verify directive
//! - Remote page and sync log types
//! - Local ledger types (invoices, payment allocations)
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other WooLedger crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
