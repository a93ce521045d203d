//! # WooLedger host
//!
//! Wires configuration, storage, the WooCommerce client and the
//! reconciliation scheduler into one [`AppContext`].

pub mod context;

pub use context::AppContext;
