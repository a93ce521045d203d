//! Capability-checked entry points the host exposes to its users.

pub mod ports;
pub mod service;

pub use service::{PaymentEntryService, SalesInvoiceService};
