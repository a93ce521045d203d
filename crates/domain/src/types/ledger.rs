//! Local invoices and the payments allocated against them.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Lifecycle of a purchase invoice. Only `Posted` invoices are eligible for
/// automatic settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Posted,
    Paid,
}

impl_domain_status_conversions!(InvoiceStatus {
    Draft => "draft",
    Posted => "posted",
    Paid => "paid",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub grand_total: f64,
    pub outstanding_amount: f64,
    pub status: InvoiceStatus,
}

/// A payment amount applied against one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    pub payment_entry: String,
    pub invoice_id: String,
    pub allocated_amount: f64,
}

/// Converts a currency amount to cents, rounding half away from zero.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationFailure {
    pub invoice_id: String,
    pub reason: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub examined: usize,
    pub marked_paid: Vec<String>,
    pub partially_paid: usize,
    pub failed: Vec<ReconciliationFailure>,
}
