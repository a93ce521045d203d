//! Remote payloads and buffered HTTP responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{NO_BODY_PLACEHOLDER, TOTAL_PAGES_HEADER};

/// One record as returned by the store. Opaque to the connector.
pub type RemoteRecord = Value;

/// Records gathered from one listing, with the page count that produced
/// them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResponse {
    pub payload: Vec<RemoteRecord>,
    pub total_pages: u32,
}

/// Best-effort decoding of a response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    /// Body that is not valid UTF-8.
    Placeholder,
}

impl ResponseBody {
    /// Decodes as JSON, then as UTF-8 text, then gives up with a placeholder.
    pub fn decode(bytes: &[u8]) -> Self {
        if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
            return Self::Json(value);
        }
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::Text(text.to_string()),
            Err(_) => Self::Placeholder,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
            Self::Placeholder => Value::String(NO_BODY_PLACEHOLDER.to_string()),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Placeholder => f.write_str(NO_BODY_PLACEHOLDER),
        }
    }
}

/// Fully buffered response from the store.
///
/// Header names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteResponse {
    pub status: u16,
    /// Final request URL with the consumer secret masked.
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl RemoteResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn decoded_body(&self) -> ResponseBody {
        ResponseBody::decode(&self.body)
    }

    /// Parses the body as JSON without falling back.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Page count advertised by the store; see [`parse_total_pages`].
    pub fn total_pages(&self) -> u32 {
        parse_total_pages(self.header(TOTAL_PAGES_HEADER))
    }
}

/// Reads an `X-WP-TotalPages` value. Missing, malformed, or zero counts as a
/// single page so that a listing is never under-fetched.
pub fn parse_total_pages(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok()).filter(|pages| *pages > 0).unwrap_or(1)
}
