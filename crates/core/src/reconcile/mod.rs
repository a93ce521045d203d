//! Payment auto-reconciliation.

pub mod ports;
pub mod service;

pub use service::ReconciliationService;
