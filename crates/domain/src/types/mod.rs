//! Domain types and models

pub mod auth;
pub mod documents;
pub mod ledger;
pub mod remote;
pub mod settings;
pub mod sync_log;

pub use auth::{Capability, Principal};
pub use documents::{
    PaymentEntryDraft, PaymentEntryRequest, SalesInvoiceDraft, SalesOrderRef,
};
pub use ledger::{
    to_minor_units, Invoice, InvoiceStatus, PaymentAllocation, ReconciliationFailure,
    ReconciliationReport,
};
pub use remote::{parse_total_pages, PageResponse, RemoteRecord, RemoteResponse, ResponseBody};
pub use settings::{ApiSecret, ConnectionSettings, SettingsRecord, VerifyDirective};
pub use sync_log::{LogSeverity, SyncLogEntry};
