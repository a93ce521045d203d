//! Host ERP documents prepared by the whitelisted entry points.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Arguments accepted when preparing a payment entry against a source
/// document. Everything except the document reference is optional and is
/// forwarded to the host factory untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentEntryRequest {
    /// Source document type, e.g. `Sales Invoice`.
    pub dt: String,
    /// Source document name.
    pub dn: String,
    #[serde(default)]
    pub party_amount: Option<f64>,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub bank_amount: Option<f64>,
    #[serde(default)]
    pub party_type: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentEntryDraft {
    pub company: String,
    pub payment_type: String,
    pub party_type: String,
    pub party: String,
    pub paid_amount: f64,
    pub reference_doctype: String,
    pub reference_name: String,
    pub mode_of_payment: Option<String>,
    pub paid_to: Option<String>,
    pub reference_date: Option<NaiveDate>,
}

/// The WooCommerce bookkeeping fields of a sales order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesOrderRef {
    pub id: String,
    pub woocommerce_payment_method: Option<String>,
    pub woocommerce_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesInvoiceDraft {
    pub sales_order: String,
    pub customer: String,
    pub grand_total: f64,
    pub woocommerce_payment_method: Option<String>,
    pub woocommerce_order_id: Option<String>,
}
