//! Entity-level reads over the WooCommerce API.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use wooledger_core::{incremental_filter, PaginationWalker, SyncEntity};
use wooledger_domain::{RemoteRecord, RemoteResponse, Result, WooLedgerError};

use super::client::WooCommerceClient;

const PRODUCTS: &str = "products";
const CUSTOMERS: &str = "customers";
const ORDERS: &str = "orders";
const COUNTRIES: &str = "/admin/countries.json";

/// Products, customers, orders and reference data pulled from the store.
///
/// Each call loads a fresh settings snapshot, so a listing is always walked
/// with one consistent set of credentials and filters.
pub struct WooCommerceCatalog {
    client: Arc<WooCommerceClient>,
    walker: PaginationWalker,
}

impl WooCommerceCatalog {
    pub fn new(client: Arc<WooCommerceClient>) -> Self {
        let walker = PaginationWalker::new(client.clone());
        Self { client, walker }
    }

    /// Products changed since the last sync (and only published ones when
    /// configured). `ignore_filters` pulls the whole catalogue.
    pub async fn items(&self, ignore_filters: bool) -> Result<Vec<RemoteRecord>> {
        let settings = self.client.settings().load().await?;
        let filter = incremental_filter(SyncEntity::Products, &settings, ignore_filters);
        let page = self.walker.walk(&settings, PRODUCTS, &filter).await?;
        info!(count = page.payload.len(), pages = page.total_pages, "fetched products");
        Ok(page.payload)
    }

    pub async fn item_variants(&self, product_id: u64) -> Result<Vec<RemoteRecord>> {
        let settings = self.client.settings().load().await?;
        let path = format!("{PRODUCTS}/{product_id}/variations");
        Ok(self.walker.walk(&settings, &path, "").await?.payload)
    }

    /// The `images` of one product.
    pub async fn item_images(&self, product_id: u64) -> Result<Vec<RemoteRecord>> {
        let path = format!("{PRODUCTS}/{product_id}");
        let product = record(&self.client.fetch(&path).await?, &path)?;
        match field(product, "images", &path)? {
            Value::Array(images) => Ok(images),
            _ => Err(WooLedgerError::RemoteCall(format!("{path}: images is not a list"))),
        }
    }

    pub async fn tax(&self, tax_id: u64) -> Result<RemoteRecord> {
        let path = format!("taxes/{tax_id}");
        record(&self.client.fetch(&path).await?, &path)
    }

    pub async fn customer(&self, customer_id: u64) -> Result<RemoteRecord> {
        let path = format!("{CUSTOMERS}/{customer_id}");
        record(&self.client.fetch(&path).await?, &path)
    }

    /// Customers changed since the last sync; all customers when
    /// `ignore_filters` is set.
    pub async fn customers(&self, ignore_filters: bool) -> Result<Vec<RemoteRecord>> {
        let settings = self.client.settings().load().await?;
        let filter = incremental_filter(SyncEntity::Customers, &settings, ignore_filters);
        let page = self.walker.walk(&settings, CUSTOMERS, &filter).await?;
        info!(count = page.payload.len(), pages = page.total_pages, "fetched customers");
        Ok(page.payload)
    }

    pub async fn orders(&self, status: &str) -> Result<Vec<RemoteRecord>> {
        let settings = self.client.settings().load().await?;
        let suffix = format!("status={status}");
        let page = self.walker.walk(&settings, ORDERS, &suffix).await?;
        info!(status, count = page.payload.len(), "fetched orders");
        Ok(page.payload)
    }

    pub async fn countries(&self) -> Result<Value> {
        let countries = record(&self.client.fetch(COUNTRIES).await?, COUNTRIES)?;
        field(countries, "countries", COUNTRIES)
    }
}

fn record(response: &RemoteResponse, path: &str) -> Result<RemoteRecord> {
    if !response.is_success() {
        return Err(WooLedgerError::RemoteCall(format!(
            "{path} returned status {}",
            response.status
        )));
    }
    response
        .json()
        .ok_or_else(|| WooLedgerError::RemoteCall(format!("{path} did not return JSON")))
}

fn field(mut record: RemoteRecord, name: &str, path: &str) -> Result<Value> {
    record
        .get_mut(name)
        .map(Value::take)
        .ok_or_else(|| WooLedgerError::RemoteCall(format!("{path}: missing {name}")))
}
