//! In-memory `InvoiceRepository` and host document ports.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use wooledger_core::{
    BankAccountResolver, InvoiceRepository, LedgerLookup, ModeOfPaymentRepository,
    PaymentEntryFactory, SalesInvoiceFactory,
};
use wooledger_domain::{
    Invoice, InvoiceStatus, PaymentAllocation, PaymentEntryDraft, PaymentEntryRequest,
    Result as DomainResult, SalesInvoiceDraft, SalesOrderRef, WooLedgerError,
};

pub fn posted_invoice(id: &str, grand_total: f64) -> Invoice {
    Invoice {
        id: id.to_string(),
        grand_total,
        outstanding_amount: grand_total,
        status: InvoiceStatus::Posted,
    }
}

pub fn allocation(invoice_id: &str, payment_entry: &str, amount: f64) -> PaymentAllocation {
    PaymentAllocation {
        payment_entry: payment_entry.to_string(),
        invoice_id: invoice_id.to_string(),
        allocated_amount: amount,
    }
}

/// Mutable invoice store mirroring the conditional-update semantics of the
/// SQLite repository.
#[derive(Default)]
pub struct MemoryInvoices {
    invoices: Mutex<Vec<Invoice>>,
    allocations: Vec<PaymentAllocation>,
    broken: HashSet<String>,
}

impl MemoryInvoices {
    pub fn new(invoices: Vec<Invoice>, allocations: Vec<PaymentAllocation>) -> Self {
        Self { invoices: Mutex::new(invoices), allocations, broken: HashSet::new() }
    }

    /// Allocation lookups for `invoice_id` will fail.
    pub fn with_broken(mut self, invoice_id: &str) -> Self {
        self.broken.insert(invoice_id.to_string());
        self
    }

    pub async fn status_of(&self, invoice_id: &str) -> Option<InvoiceStatus> {
        self.invoices.lock().await.iter().find(|inv| inv.id == invoice_id).map(|inv| inv.status)
    }
}

#[async_trait]
impl InvoiceRepository for MemoryInvoices {
    async fn unpaid_posted_invoices(&self) -> DomainResult<Vec<Invoice>> {
        Ok(self
            .invoices
            .lock()
            .await
            .iter()
            .filter(|inv| inv.status == InvoiceStatus::Posted)
            .cloned()
            .collect())
    }

    async fn allocations_for(&self, invoice_id: &str) -> DomainResult<Vec<PaymentAllocation>> {
        if self.broken.contains(invoice_id) {
            return Err(WooLedgerError::Database(format!("cannot read allocations of {invoice_id}")));
        }
        Ok(self.allocations.iter().filter(|a| a.invoice_id == invoice_id).cloned().collect())
    }

    async fn mark_paid(&self, invoice_id: &str) -> DomainResult<bool> {
        let mut invoices = self.invoices.lock().await;
        match invoices.iter_mut().find(|inv| inv.id == invoice_id) {
            Some(inv) if inv.status == InvoiceStatus::Posted => {
                inv.status = InvoiceStatus::Paid;
                inv.outstanding_amount = 0.0;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Host document double for the entry-point services.
#[derive(Default)]
pub struct FakeHost {
    pub invoice_methods: HashMap<String, String>,
    pub modes: HashMap<String, String>,
    pub accounts: HashMap<(String, String), String>,
    pub orders: HashMap<String, SalesOrderRef>,
    pub payment_requests: Mutex<Vec<PaymentEntryRequest>>,
}

#[async_trait]
impl PaymentEntryFactory for FakeHost {
    async fn build(&self, request: &PaymentEntryRequest) -> DomainResult<PaymentEntryDraft> {
        self.payment_requests.lock().await.push(request.clone());
        Ok(PaymentEntryDraft {
            company: "Acme Ltd".to_string(),
            payment_type: request.payment_type.clone().unwrap_or_else(|| "Receive".to_string()),
            party_type: request.party_type.clone().unwrap_or_else(|| "Customer".to_string()),
            party: "Jane Doe".to_string(),
            paid_amount: request.party_amount.unwrap_or(120.0),
            reference_doctype: request.dt.clone(),
            reference_name: request.dn.clone(),
            mode_of_payment: None,
            paid_to: request.bank_account.clone(),
            reference_date: request.reference_date,
        })
    }
}

#[async_trait]
impl SalesInvoiceFactory for FakeHost {
    async fn build(&self, sales_order_id: &str) -> DomainResult<SalesInvoiceDraft> {
        Ok(SalesInvoiceDraft {
            sales_order: sales_order_id.to_string(),
            customer: "Jane Doe".to_string(),
            grand_total: 120.0,
            woocommerce_payment_method: None,
            woocommerce_order_id: None,
        })
    }
}

#[async_trait]
impl LedgerLookup for FakeHost {
    async fn sales_invoice_payment_method(&self, invoice_id: &str) -> DomainResult<Option<String>> {
        Ok(self.invoice_methods.get(invoice_id).cloned())
    }

    async fn sales_order(&self, sales_order_id: &str) -> DomainResult<SalesOrderRef> {
        self.orders
            .get(sales_order_id)
            .cloned()
            .ok_or_else(|| WooLedgerError::NotFound(format!("Sales Order {sales_order_id}")))
    }
}

#[async_trait]
impl ModeOfPaymentRepository for FakeHost {
    async fn mode_of_payment_for(&self, woocommerce_method: &str) -> DomainResult<Option<String>> {
        Ok(self.modes.get(woocommerce_method).cloned())
    }
}

#[async_trait]
impl BankAccountResolver for FakeHost {
    async fn bank_cash_account(
        &self,
        mode_of_payment: &str,
        company: &str,
    ) -> DomainResult<Option<String>> {
        Ok(self.accounts.get(&(mode_of_payment.to_string(), company.to_string())).cloned())
    }
}
