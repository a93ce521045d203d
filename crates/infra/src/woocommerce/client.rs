//! REST client core for the WooCommerce `wc/v3` API.
//!
//! Every call goes through [`WooCommerceClient::execute`], which builds the
//! authenticated URL, applies the per-verb timeout, buffers the response and
//! writes exactly one sync log entry when the call fails (transport error or
//! a status outside the verb's accepted set). Non-accepted statuses are
//! returned to the caller as data.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{error, warn};
use url::Url;
use wooledger_core::{RemoteApi, SettingsProvider, SyncLogSink};
use wooledger_domain::constants::{
    CONSUMER_KEY_PARAM, CONSUMER_SECRET_PARAM, REDACTED, REST_API_PREFIX, REST_API_VERSION,
};
use wooledger_domain::{
    ConnectionSettings, HttpConfig, RemoteResponse, Result, SyncLogEntry, VerifyDirective,
    WooLedgerError,
};

use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    fn log_method(self) -> &'static str {
        match self {
            Self::Get => "get_request",
            Self::Post => "post_request",
            Self::Put => "put_request",
            Self::Delete => "delete_request",
        }
    }

    fn accepts(self, status: u16) -> bool {
        match self {
            Self::Get | Self::Delete => status == 200,
            Self::Post | Self::Put => status == 200 || status == 201,
        }
    }
}

/// Authenticated client for one store.
pub struct WooCommerceClient {
    settings: Arc<SettingsProvider>,
    sync_log: Arc<dyn SyncLogSink>,
    http: HttpConfig,
    transport: Mutex<Option<(VerifyDirective, HttpClient)>>,
}

impl WooCommerceClient {
    pub fn new(
        settings: Arc<SettingsProvider>,
        sync_log: Arc<dyn SyncLogSink>,
        http: HttpConfig,
    ) -> Self {
        Self { settings, sync_log, http, transport: Mutex::new(None) }
    }

    /// Provider used by the `*` variants that load their own snapshot.
    pub fn settings(&self) -> &Arc<SettingsProvider> {
        &self.settings
    }

    pub async fn fetch(&self, path: &str) -> Result<RemoteResponse> {
        let settings = self.settings.load().await?;
        self.fetch_with(path, &settings).await
    }

    pub async fn fetch_with(
        &self,
        path: &str,
        settings: &ConnectionSettings,
    ) -> Result<RemoteResponse> {
        self.execute(Verb::Get, path, None, settings).await
    }

    pub async fn create(&self, path: &str, body: &Value) -> Result<Value> {
        let settings = self.settings.load().await?;
        self.create_with(path, body, &settings).await
    }

    pub async fn create_with(
        &self,
        path: &str,
        body: &Value,
        settings: &ConnectionSettings,
    ) -> Result<Value> {
        let response = self.execute(Verb::Post, path, Some(body), settings).await?;
        Ok(response.decoded_body().into_value())
    }

    pub async fn replace(&self, path: &str, body: &Value) -> Result<Value> {
        let settings = self.settings.load().await?;
        self.replace_with(path, body, &settings).await
    }

    pub async fn replace_with(
        &self,
        path: &str,
        body: &Value,
        settings: &ConnectionSettings,
    ) -> Result<Value> {
        let response = self.execute(Verb::Put, path, Some(body), settings).await?;
        Ok(response.decoded_body().into_value())
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        let settings = self.settings.load().await?;
        self.delete_with(path, &settings).await
    }

    pub async fn delete_with(&self, path: &str, settings: &ConnectionSettings) -> Result<Value> {
        let response = self.execute(Verb::Delete, path, None, settings).await?;
        Ok(response.decoded_body().into_value())
    }

    async fn execute(
        &self,
        verb: Verb,
        path: &str,
        body: Option<&Value>,
        settings: &ConnectionSettings,
    ) -> Result<RemoteResponse> {
        let request_data = match body {
            Some(body) => body.clone(),
            None => json!({ "path": path }),
        };

        match self.send(verb, path, body, settings).await {
            Ok(response) => {
                if !verb.accepts(response.status) {
                    warn!(verb = verb.label(), path, status = response.status, "WooCommerce call rejected");
                    let entry = SyncLogEntry::error(
                        format!("WooCommerce {} error {}", verb.label(), response.status),
                        verb.log_method(),
                        format!("{}: {}", response.url, response.decoded_body()),
                        request_data,
                    );
                    self.record(entry).await;
                }
                Ok(response)
            }
            Err((logged_url, err)) => {
                warn!(verb = verb.label(), path, error = %err, "WooCommerce call failed");
                let entry = SyncLogEntry::error(
                    format!("WooCommerce {} request failed", verb.label()),
                    verb.log_method(),
                    format!("{logged_url}: {err}"),
                    request_data,
                );
                self.record(entry).await;
                Err(err)
            }
        }
    }

    /// Performs the call. Errors carry the redacted URL for the log entry.
    async fn send(
        &self,
        verb: Verb,
        path: &str,
        body: Option<&Value>,
        settings: &ConnectionSettings,
    ) -> std::result::Result<RemoteResponse, (String, WooLedgerError)> {
        let url = api_url(settings, path).map_err(|err| (format!("{}/{path}", settings.base_url), err))?;
        let logged_url = redact_url(url.as_str());

        let client = self.transport(&settings.verify).map_err(|err| (logged_url.clone(), err))?;

        let mut request = client.request(verb.method(), url).timeout(self.timeout_for(verb));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = client.send(request).await.map_err(|err| (logged_url.clone(), err))?;

        let status = response.status().as_u16();
        let final_url = redact_url(response.url().as_str());
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| (logged_url.clone(), WooLedgerError::from(InfraError::from(err))))?;

        Ok(RemoteResponse { status, url: final_url, headers, body: body.to_vec() })
    }

    fn timeout_for(&self, verb: Verb) -> Duration {
        match verb {
            Verb::Get => self.http.fetch_timeout(),
            Verb::Post => self.http.create_timeout(),
            Verb::Put => self.http.replace_timeout(),
            Verb::Delete => self.http.delete_timeout(),
        }
    }

    /// Reuses the transport while the verify directive is unchanged.
    fn transport(&self, verify: &VerifyDirective) -> Result<HttpClient> {
        let mut cached = self
            .transport
            .lock()
            .map_err(|_| WooLedgerError::Internal("HTTP transport cache poisoned".into()))?;

        if let Some((directive, client)) = cached.as_ref() {
            if directive == verify {
                return Ok(client.clone());
            }
        }

        let client = HttpClient::builder()
            .user_agent(self.http.user_agent.clone())
            .verify(verify.clone())
            .build()?;
        *cached = Some((verify.clone(), client.clone()));
        Ok(client)
    }

    async fn record(&self, entry: SyncLogEntry) {
        let title = entry.title.clone();
        if let Err(err) = self.sync_log.record(entry).await {
            error!(title = %title, error = %err, "failed to persist sync log entry");
        }
    }
}

#[async_trait]
impl RemoteApi for WooCommerceClient {
    async fn fetch_with(
        &self,
        path: &str,
        settings: &ConnectionSettings,
    ) -> Result<RemoteResponse> {
        WooCommerceClient::fetch_with(self, path, settings).await
    }
}

/// `{base}/wp-json/wc/v3/{path}` with the consumer credentials appended to
/// whatever query string `path` already carries.
pub(crate) fn api_url(settings: &ConnectionSettings, path: &str) -> Result<Url> {
    let raw = format!(
        "{}/{}/{}/{}",
        settings.base_url.trim_end_matches('/'),
        REST_API_PREFIX,
        REST_API_VERSION,
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&raw)
        .map_err(|err| WooLedgerError::Config(format!("invalid WooCommerce URL {raw}: {err}")))?;
    url.query_pairs_mut()
        .append_pair(CONSUMER_KEY_PARAM, &settings.api_key)
        .append_pair(CONSUMER_SECRET_PARAM, settings.api_secret.expose());
    Ok(url)
}

/// Masks the `consumer_secret` query value.
pub(crate) fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if !url.query_pairs().any(|(key, _)| key == CONSUMER_SECRET_PARAM) {
        return raw.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value =
                if key == CONSUMER_SECRET_PARAM { REDACTED.to_string() } else { value.into_owned() };
            (key.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}
