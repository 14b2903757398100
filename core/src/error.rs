//! Error types for the FishCatch API client.
//!
//! # Design
//! Configuration and validation failures are raised before any transport call.
//! Everything that reaches the network is classified into `Network`,
//! `HttpStatus` or `UnexpectedContentType`, each carrying the attempted URL so
//! a caller can render a useful diagnostic without extra context.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Likely causes listed on every network failure.
pub const NETWORK_CAUSES: [&str; 5] = [
    "The server is not running or not accessible",
    "Network connectivity issues",
    "CORS policy blocking the request (allow the frontend origin on the backend or use the dev proxy)",
    "Firewall or port blocking",
    "Wrong IP address or port",
];

/// Number of body characters kept when a server answers with an HTML page.
pub const HTML_SNIPPET_CHARS: usize = 200;

/// Errors returned by `ApiClient` and the resource services.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No base URL configured for the resource.
    #[error("API base URL is undefined for path: {path}. Check your configuration ({key}).")]
    MissingBaseUrl { key: &'static str, path: String },

    /// The base URL is neither absolute http(s) nor a proxy-relative path.
    #[error("API base URL must start with http(s):// or be a relative path for a dev proxy. Got: \"{base_url}\"")]
    InvalidBaseUrl { base_url: String },

    /// A proxy-relative URL was built but the transport has no origin for it.
    #[error("Cannot send relative URL {url}: no dev proxy origin is configured. Set a proxy origin on the transport or use an absolute http(s):// base URL.")]
    MissingProxyOrigin { url: String },

    /// A caller-supplied value failed a local precondition.
    #[error("{0}")]
    Validation(String),

    /// The transport could not complete the round-trip.
    #[error("Failed to connect to server at {url}. This could mean:\n{causes}\n\nOriginal error: {message}", causes = numbered_causes())]
    Network { url: String, message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} {status_text} at {url}{}", body_clause(.body))]
    HttpStatus {
        status: u16,
        status_text: String,
        url: String,
        body: String,
    },

    /// The server answered a non-2xx status with an HTML page.
    #[error(
        "HTTP {status} at {url}. Server returned HTML instead of JSON. Possible causes:\n\
         1) Wrong API URL or route\n\
         2) Server not running or reverse proxy misroute\n\
         3) CORS middleware not applied to this route\n\
         Received (first 200 chars): {snippet}..."
    )]
    UnexpectedContentType {
        status: u16,
        url: String,
        snippet: String,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response payload did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// True for errors raised before any network call because of bad settings.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ApiError::MissingBaseUrl { .. }
                | ApiError::InvalidBaseUrl { .. }
                | ApiError::MissingProxyOrigin { .. }
        )
    }

    /// HTTP status for errors that came back from the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } | ApiError::UnexpectedContentType { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// URL of the attempted call, when the error carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            ApiError::Network { url, .. }
            | ApiError::MissingProxyOrigin { url }
            | ApiError::HttpStatus { url, .. }
            | ApiError::UnexpectedContentType { url, .. } => Some(url),
            _ => None,
        }
    }
}

fn numbered_causes() -> String {
    NETWORK_CAUSES
        .iter()
        .enumerate()
        .map(|(i, cause)| format!("{}. {cause}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn body_clause(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(", body: {body}")
    }
}

/// Per-field messages produced by local form validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}
