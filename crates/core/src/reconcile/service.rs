//! Reconciliation engine: settles posted invoices whose allocated payments
//! cover the grand total.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info};
use wooledger_domain::constants::RECONCILE_METHOD;
use wooledger_domain::{
    to_minor_units, Invoice, ReconciliationFailure, ReconciliationReport, Result, SyncLogEntry,
};

use super::ports::InvoiceRepository;
use crate::sync::ports::SyncLogSink;

const PAID_TITLE: &str = "Invoice marked Paid";

enum Outcome {
    MarkedPaid,
    AlreadySettled,
    PartiallyPaid,
    Unpaid,
}

/// Runs one reconciliation pass over the local ledger.
pub struct ReconciliationService {
    invoices: Arc<dyn InvoiceRepository>,
    sync_log: Arc<dyn SyncLogSink>,
}

impl ReconciliationService {
    pub fn new(invoices: Arc<dyn InvoiceRepository>, sync_log: Arc<dyn SyncLogSink>) -> Self {
        Self { invoices, sync_log }
    }

    /// Examine every posted, unpaid invoice and mark it Paid when the sum of
    /// its allocations reaches the grand total.
    ///
    /// Each transition is committed on its own. A failure on one invoice is
    /// recorded in the report and the pass moves on; only a failure to list
    /// candidates aborts the run.
    pub async fn run(&self) -> Result<ReconciliationReport> {
        let candidates = self.invoices.unpaid_posted_invoices().await?;
        let mut report = ReconciliationReport { examined: candidates.len(), ..Default::default() };

        for invoice in &candidates {
            match self.reconcile_one(invoice).await {
                Ok(Outcome::MarkedPaid) => report.marked_paid.push(invoice.id.clone()),
                Ok(Outcome::PartiallyPaid) => report.partially_paid += 1,
                Ok(Outcome::AlreadySettled | Outcome::Unpaid) => {}
                Err(err) => {
                    error!(invoice = %invoice.id, error = %err, "failed to reconcile invoice");
                    report.failed.push(ReconciliationFailure {
                        invoice_id: invoice.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            examined = report.examined,
            marked_paid = report.marked_paid.len(),
            partially_paid = report.partially_paid,
            failed = report.failed.len(),
            "reconciliation pass complete"
        );
        Ok(report)
    }

    async fn reconcile_one(&self, invoice: &Invoice) -> Result<Outcome> {
        let allocations = self.invoices.allocations_for(&invoice.id).await?;
        let paid_cents: i64 =
            allocations.iter().map(|allocation| to_minor_units(allocation.allocated_amount)).sum();
        let total_cents = to_minor_units(invoice.grand_total);

        if paid_cents < total_cents {
            return Ok(if paid_cents > 0 { Outcome::PartiallyPaid } else { Outcome::Unpaid });
        }

        if !self.invoices.mark_paid(&invoice.id).await? {
            debug!(invoice = %invoice.id, "invoice already settled elsewhere");
            return Ok(Outcome::AlreadySettled);
        }

        info!(invoice = %invoice.id, "Invoice {} marked as Paid", invoice.id);
        self.audit_transition(invoice, paid_cents).await;
        Ok(Outcome::MarkedPaid)
    }

    async fn audit_transition(&self, invoice: &Invoice, paid_cents: i64) {
        let entry = SyncLogEntry::info(
            PAID_TITLE,
            RECONCILE_METHOD,
            format!("Invoice {} marked as Paid", invoice.id),
            json!({
                "invoice": invoice.id,
                "grand_total": invoice.grand_total,
                "allocated_total": paid_cents as f64 / 100.0,
            }),
        );
        if let Err(err) = self.sync_log.record(entry).await {
            error!(invoice = %invoice.id, error = %err, "failed to write reconciliation audit entry");
        }
    }
}
