//! WooCommerce REST API (`wc/v3`) client and catalog.

pub mod catalog;
pub mod client;

pub use catalog::WooCommerceCatalog;
pub use client::WooCommerceClient;
