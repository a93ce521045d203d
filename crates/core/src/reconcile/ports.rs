//! Port interfaces for the local ledger

use async_trait::async_trait;
use wooledger_domain::{Invoice, PaymentAllocation, Result};

/// Invoice and allocation access used by the reconciliation engine
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Posted invoices whose status is not yet Paid
    async fn unpaid_posted_invoices(&self) -> Result<Vec<Invoice>>;

    /// Every payment allocation referencing `invoice_id`
    async fn allocations_for(&self, invoice_id: &str) -> Result<Vec<PaymentAllocation>>;

    /// Move a Posted invoice to Paid and commit.
    ///
    /// Returns `false` when the invoice was no longer Posted, which makes a
    /// repeated or concurrent transition a no-op.
    async fn mark_paid(&self, invoice_id: &str) -> Result<bool>;
}
