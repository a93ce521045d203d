use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use wooledger_domain::{Result, VerifyDirective, WooLedgerError};

use crate::errors::InfraError;

/// HTTP client configured for one TLS verify directive.
///
/// Requests are sent once; the connector never retries automatically.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| WooLedgerError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %path, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %path, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    verify: VerifyDirective,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: None, user_agent: None, verify: VerifyDirective::Secure }
    }
}

impl HttpClientBuilder {
    /// Client-wide timeout. Per-request timeouts override it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// How server certificates are checked.
    pub fn verify(mut self, directive: VerifyDirective) -> Self {
        self.verify = directive;
        self
    }

    /// # Errors
    ///
    /// [`WooLedgerError::Config`] when a custom CA bundle cannot be read or
    /// parsed.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().no_proxy();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        match &self.verify {
            VerifyDirective::Secure => {}
            VerifyDirective::Insecure => {
                builder = builder.danger_accept_invalid_certs(true);
            }
            VerifyDirective::CustomBundle(path) => {
                builder = builder.tls_built_in_root_certs(false);
                for certificate in load_ca_bundle(path)? {
                    builder = builder.add_root_certificate(certificate);
                }
            }
        }

        let client = builder.build().map_err(|err| WooLedgerError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

/// Reads a CA bundle. `.der`/`.cer` files that are not PEM-armoured are
/// parsed as a single DER certificate.
fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>> {
    let bytes = std::fs::read(path).map_err(|err| {
        WooLedgerError::Config(format!("unable to read CA bundle {}: {err}", path.display()))
    })?;

    let binary_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("der") || ext.eq_ignore_ascii_case("cer"));
    let is_pem = bytes.windows(10).any(|window| window == b"-----BEGIN");

    let parsed = if binary_extension && !is_pem {
        Certificate::from_der(&bytes).map(|certificate| vec![certificate])
    } else {
        Certificate::from_pem_bundle(&bytes)
    };

    match parsed {
        Ok(certificates) if !certificates.is_empty() => Ok(certificates),
        Ok(_) => Err(WooLedgerError::Config(format!(
            "CA bundle {} contains no certificates",
            path.display()
        ))),
        Err(err) => Err(WooLedgerError::Config(format!(
            "invalid CA bundle {}: {err}",
            path.display()
        ))),
    }
}
