//! Reconciliation against the SQLite ledger.

mod support;

use std::sync::Arc;

use support::TestDatabase;
use wooledger_core::{ReconciliationService, SyncLogSink};
use wooledger_domain::constants::RECONCILE_METHOD;
use wooledger_domain::{Invoice, InvoiceStatus, LogSeverity, PaymentAllocation};
use wooledger_infra::database::{SqliteInvoiceRepository, SqliteSyncLogRepository};

fn invoice(id: &str, grand_total: f64) -> Invoice {
    Invoice {
        id: id.to_string(),
        grand_total,
        outstanding_amount: grand_total,
        status: InvoiceStatus::Posted,
    }
}

fn allocation(invoice_id: &str, payment_entry: &str, amount: f64) -> PaymentAllocation {
    PaymentAllocation {
        payment_entry: payment_entry.to_string(),
        invoice_id: invoice_id.to_string(),
        allocated_amount: amount,
    }
}

struct Ledger {
    _db: TestDatabase,
    invoices: Arc<SqliteInvoiceRepository>,
    sync_log: Arc<SqliteSyncLogRepository>,
    service: ReconciliationService,
}

fn ledger() -> Ledger {
    let db = TestDatabase::new();
    let invoices = Arc::new(SqliteInvoiceRepository::new(db.manager.clone()));
    let sync_log = Arc::new(SqliteSyncLogRepository::new(db.manager.clone()));
    let service = ReconciliationService::new(invoices.clone(), sync_log.clone());
    Ledger { _db: db, invoices, sync_log, service }
}

#[tokio::test]
async fn settles_only_fully_allocated_invoices() {
    let ledger = ledger();
    ledger.invoices.save_invoice(&invoice("PINV-1", 500.0)).await.unwrap();
    ledger.invoices.save_invoice(&invoice("PINV-2", 500.0)).await.unwrap();
    ledger.invoices.save_invoice(&invoice("PINV-3", 80.0)).await.unwrap();

    ledger.invoices.add_allocation(&allocation("PINV-1", "PE-1", 300.0)).await.unwrap();
    ledger.invoices.add_allocation(&allocation("PINV-1", "PE-2", 200.0)).await.unwrap();
    ledger.invoices.add_allocation(&allocation("PINV-2", "PE-3", 499.99)).await.unwrap();

    let report = ledger.service.run().await.expect("pass succeeds");

    assert_eq!(report.examined, 3);
    assert_eq!(report.marked_paid, vec!["PINV-1".to_string()]);
    assert_eq!(report.partially_paid, 1);
    assert!(report.failed.is_empty());

    let paid = ledger.invoices.find("PINV-1").await.unwrap().expect("invoice exists");
    assert_eq!(paid.status, InvoiceStatus::Paid);
    let partial = ledger.invoices.find("PINV-2").await.unwrap().expect("invoice exists");
    assert_eq!(partial.status, InvoiceStatus::Posted);
    let untouched = ledger.invoices.find("PINV-3").await.unwrap().expect("invoice exists");
    assert_eq!(untouched.status, InvoiceStatus::Posted);

    let log = ledger.sync_log.recent(10).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].severity, LogSeverity::Info);
    assert_eq!(log[0].method, RECONCILE_METHOD);
    assert!(log[0].message.contains("PINV-1"));
}

#[tokio::test]
async fn second_pass_changes_nothing() {
    let ledger = ledger();
    ledger.invoices.save_invoice(&invoice("PINV-9", 120.5)).await.unwrap();
    ledger.invoices.add_allocation(&allocation("PINV-9", "PE-9", 120.5)).await.unwrap();

    let first = ledger.service.run().await.unwrap();
    assert_eq!(first.marked_paid.len(), 1);

    let second = ledger.service.run().await.unwrap();
    assert_eq!(second.examined, 0);
    assert!(second.marked_paid.is_empty());
    assert_eq!(ledger.sync_log.recent(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn draft_invoices_are_not_candidates() {
    let ledger = ledger();
    let draft = Invoice { status: InvoiceStatus::Draft, ..invoice("PINV-D", 10.0) };
    ledger.invoices.save_invoice(&draft).await.unwrap();
    ledger.invoices.add_allocation(&allocation("PINV-D", "PE-D", 10.0)).await.unwrap();

    let report = ledger.service.run().await.unwrap();

    assert_eq!(report.examined, 0);
    let stored = ledger.invoices.find("PINV-D").await.unwrap().expect("invoice exists");
    assert_eq!(stored.status, InvoiceStatus::Draft);
}

#[tokio::test]
async fn cent_rounding_absorbs_float_noise() {
    let ledger = ledger();
    ledger.invoices.save_invoice(&invoice("PINV-F", 0.3)).await.unwrap();
    ledger.invoices.add_allocation(&allocation("PINV-F", "PE-a", 0.1)).await.unwrap();
    ledger.invoices.add_allocation(&allocation("PINV-F", "PE-b", 0.2)).await.unwrap();

    let report = ledger.service.run().await.unwrap();

    assert_eq!(report.marked_paid, vec!["PINV-F".to_string()]);
}
