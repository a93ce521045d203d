//! Payment entry and sales invoice preparation.
//!
//! Both services check the caller's capability before touching any port, so
//! a rejected call has no side effects.

use std::sync::Arc;

use tracing::{debug, info, warn};
use wooledger_domain::constants::SALES_INVOICE_DOCTYPE;
use wooledger_domain::{
    Capability, PaymentEntryDraft, PaymentEntryRequest, Principal, Result, SalesInvoiceDraft,
    WooLedgerError,
};

use super::ports::{
    BankAccountResolver, LedgerLookup, ModeOfPaymentRepository, PaymentEntryFactory,
    SalesInvoiceFactory,
};

fn authorize(principal: &Principal, capability: Capability) -> Result<()> {
    if principal.can(capability) {
        return Ok(());
    }
    warn!(user = %principal.user, %capability, "capability check failed");
    Err(WooLedgerError::Auth(format!("{} lacks {capability}", principal.user)))
}

/// Prepares payment entries, defaulting the mode of payment and paid-to
/// account from the WooCommerce payment method of a sales invoice.
pub struct PaymentEntryService {
    factory: Arc<dyn PaymentEntryFactory>,
    lookup: Arc<dyn LedgerLookup>,
    modes: Arc<dyn ModeOfPaymentRepository>,
    accounts: Arc<dyn BankAccountResolver>,
}

impl PaymentEntryService {
    pub fn new(
        factory: Arc<dyn PaymentEntryFactory>,
        lookup: Arc<dyn LedgerLookup>,
        modes: Arc<dyn ModeOfPaymentRepository>,
        accounts: Arc<dyn BankAccountResolver>,
    ) -> Self {
        Self { factory, lookup, modes, accounts }
    }

    pub async fn prepare_payment_entry(
        &self,
        principal: &Principal,
        request: &PaymentEntryRequest,
    ) -> Result<PaymentEntryDraft> {
        authorize(principal, Capability::CreatePaymentEntry)?;

        let mut draft = self.factory.build(request).await?;
        if request.dt != SALES_INVOICE_DOCTYPE {
            return Ok(draft);
        }

        let Some(method) = self.lookup.sales_invoice_payment_method(&request.dn).await? else {
            debug!(invoice = %request.dn, "sales invoice has no WooCommerce payment method");
            return Ok(draft);
        };
        let Some(mode) = self.modes.mode_of_payment_for(&method).await? else {
            debug!(invoice = %request.dn, method = %method, "no mode of payment mapped");
            return Ok(draft);
        };

        draft.paid_to = self.accounts.bank_cash_account(&mode, &draft.company).await?;
        info!(invoice = %request.dn, mode = %mode, "defaulted mode of payment from WooCommerce");
        draft.mode_of_payment = Some(mode);
        Ok(draft)
    }
}

/// Prepares sales invoices that keep the WooCommerce order references of
/// their sales order.
pub struct SalesInvoiceService {
    factory: Arc<dyn SalesInvoiceFactory>,
    lookup: Arc<dyn LedgerLookup>,
}

impl SalesInvoiceService {
    pub fn new(factory: Arc<dyn SalesInvoiceFactory>, lookup: Arc<dyn LedgerLookup>) -> Self {
        Self { factory, lookup }
    }

    pub async fn make_sales_invoice(
        &self,
        principal: &Principal,
        sales_order_id: &str,
    ) -> Result<SalesInvoiceDraft> {
        authorize(principal, Capability::CreateSalesInvoice)?;

        let order = self.lookup.sales_order(sales_order_id).await?;
        let mut draft = self.factory.build(sales_order_id).await?;
        draft.woocommerce_payment_method = order.woocommerce_payment_method;
        draft.woocommerce_order_id = order.woocommerce_order_id;
        Ok(draft)
    }
}
