//! Port interfaces to the host ERP document model

use async_trait::async_trait;
use wooledger_domain::{
    PaymentEntryDraft, PaymentEntryRequest, Result, SalesInvoiceDraft, SalesOrderRef,
};

/// Host factory producing an unsaved payment entry for a source document
#[async_trait]
pub trait PaymentEntryFactory: Send + Sync {
    async fn build(&self, request: &PaymentEntryRequest) -> Result<PaymentEntryDraft>;
}

/// Host factory producing an unsaved sales invoice from a sales order
#[async_trait]
pub trait SalesInvoiceFactory: Send + Sync {
    async fn build(&self, sales_order_id: &str) -> Result<SalesInvoiceDraft>;
}

/// Read access to host documents carrying WooCommerce bookkeeping fields
#[async_trait]
pub trait LedgerLookup: Send + Sync {
    /// WooCommerce payment method recorded on a sales invoice
    async fn sales_invoice_payment_method(&self, invoice_id: &str) -> Result<Option<String>>;

    /// Sales order by id; `NotFound` when it does not exist
    async fn sales_order(&self, sales_order_id: &str) -> Result<SalesOrderRef>;
}

/// Mapping from WooCommerce payment methods to host modes of payment
#[async_trait]
pub trait ModeOfPaymentRepository: Send + Sync {
    async fn mode_of_payment_for(&self, woocommerce_method: &str) -> Result<Option<String>>;
}

/// Default bank/cash account for a mode of payment within a company
#[async_trait]
pub trait BankAccountResolver: Send + Sync {
    async fn bank_cash_account(
        &self,
        mode_of_payment: &str,
        company: &str,
    ) -> Result<Option<String>>;
}
