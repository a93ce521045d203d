//! Database implementations

pub mod invoice_repository;
pub mod manager;
pub mod mode_of_payment_repository;
pub mod settings_repository;
pub mod sync_log_repository;

pub use invoice_repository::SqliteInvoiceRepository;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
pub use mode_of_payment_repository::SqliteModeOfPaymentRepository;
pub use settings_repository::SqliteSettingsStore;
pub use sync_log_repository::SqliteSyncLogRepository;
