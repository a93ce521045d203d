//! # WooLedger Core
//!
//! Business logic for the connector - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for settings, secrets, the remote API, the
//!   sync log and the local ledger
//! - TLS verify normalization and the settings provider
//! - Incremental filter builder and pagination walker
//! - Payment auto-reconciliation engine
//! - Capability-checked payment entry / sales invoice preparation
//!
//! ## Architecture Principles
//! - Only depends on `wooledger-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod entry_points;
pub mod reconcile;
pub mod settings;
pub mod sync;

pub use entry_points::ports::{
    BankAccountResolver, LedgerLookup, ModeOfPaymentRepository, PaymentEntryFactory,
    SalesInvoiceFactory,
};
pub use entry_points::{PaymentEntryService, SalesInvoiceService};
pub use reconcile::ports::InvoiceRepository;
pub use reconcile::ReconciliationService;
pub use settings::normalizer::normalize_verify;
pub use settings::ports::{SecretAccessor, SettingsStore};
pub use settings::SettingsProvider;
pub use sync::filter::{format_sync_cursor, incremental_filter, SyncEntity};
pub use sync::pagination::PaginationWalker;
pub use sync::ports::{RemoteApi, SyncLogSink};
