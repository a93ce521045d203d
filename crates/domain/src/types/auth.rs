//! Caller identity for the whitelisted entry points.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreatePaymentEntry,
    CreateSalesInvoice,
}

impl_domain_status_conversions!(Capability {
    CreatePaymentEntry => "create_payment_entry",
    CreateSalesInvoice => "create_sales_invoice",
});

/// An authenticated caller and the capabilities the host granted it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Principal {
    pub user: String,
    pub capabilities: BTreeSet<Capability>,
}

impl Principal {
    pub fn new(user: impl Into<String>, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self { user: user.into(), capabilities: capabilities.into_iter().collect() }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
