//! Sequential page walker for list endpoints.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use wooledger_domain::constants::PAGE_SIZE;
use wooledger_domain::{
    ConnectionSettings, PageResponse, RemoteRecord, RemoteResponse, Result, WooLedgerError,
};

use super::ports::RemoteApi;

/// Fetches every page of a listing, one request at a time.
pub struct PaginationWalker {
    api: Arc<dyn RemoteApi>,
}

impl PaginationWalker {
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }

    /// Collect all records of `path`, appending `suffix` (a filter fragment,
    /// possibly empty) to every page request.
    ///
    /// The page count is taken from the first response only.
    ///
    /// # Errors
    ///
    /// Transport failures from the API, and [`WooLedgerError::RemoteCall`]
    /// when a page is not a successful JSON array.
    pub async fn walk(
        &self,
        settings: &ConnectionSettings,
        path: &str,
        suffix: &str,
    ) -> Result<PageResponse> {
        let first = self.api.fetch_with(&page_path(path, 1, suffix), settings).await?;
        let total_pages = first.total_pages();
        let mut payload = page_records(&first, path, 1)?;

        debug!(path, total_pages, first_page = payload.len(), "walking listing");

        for page in 2..=total_pages {
            let response = self.api.fetch_with(&page_path(path, page, suffix), settings).await?;
            payload.extend(page_records(&response, path, page)?);
        }

        Ok(PageResponse { payload, total_pages })
    }
}

/// `{path}?per_page=100&page={page}[&{suffix}]`
pub fn page_path(path: &str, page: u32, suffix: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    let mut url = format!("{path}{separator}per_page={PAGE_SIZE}&page={page}");
    if !suffix.is_empty() {
        url.push('&');
        url.push_str(suffix);
    }
    url
}

fn page_records(response: &RemoteResponse, path: &str, page: u32) -> Result<Vec<RemoteRecord>> {
    if !response.is_success() {
        return Err(WooLedgerError::RemoteCall(format!(
            "{path} page {page} returned status {}",
            response.status
        )));
    }
    match response.json() {
        Some(Value::Array(records)) => Ok(records),
        _ => {
            warn!(path, page, "listing page is not a JSON array");
            Err(WooLedgerError::RemoteCall(format!("{path} page {page} is not a JSON array")))
        }
    }
}
