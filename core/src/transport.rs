//! The I/O boundary: something that turns an `HttpRequest` into an `HttpResponse`.
//!
//! Non-2xx statuses are NOT transport failures. A transport reports every
//! response it receives as data and only fails when no response arrived at all
//! (name resolution, refused connection, TLS, blocked request), when the URL
//! cannot be sent anywhere, or when a 2xx body could not be read.

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// Where a transport failure happened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// No response arrived.
    #[default]
    Connection,
    /// A response arrived but its body could not be read.
    Body,
    /// The URL is relative and the transport has no origin to send it to.
    Unroutable,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Connection,
            message: message.into(),
        }
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Body,
            message: message.into(),
        }
    }

    pub fn unroutable(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Unroutable,
            message: message.into(),
        }
    }
}

pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::{UreqTransport, MAX_BODY_BYTES};

#[cfg(feature = "ureq")]
mod ureq_transport {
    use tracing::warn;
    use ureq::Agent;

    use super::{Transport, TransportError};
    use crate::http::{reason_phrase, HttpMethod, HttpRequest, HttpResponse};

    /// Response bodies larger than this are not read.
    pub const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

    /// Blocking transport backed by a shared ureq agent.
    ///
    /// Relative URLs (dev proxy mode) are sent to `origin`, which defaults to
    /// none; executing a relative URL without an origin is an `Unroutable` error.
    ///
    /// Bodies are read as bytes up to [`MAX_BODY_BYTES`] and decoded lossily, so
    /// a binary or oversized error page still reports its status.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: Agent,
        origin: Option<String>,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            // 4xx/5xx come back as data so the adapter can classify them.
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self {
                agent,
                origin: None,
            }
        }

        /// Origin that relative URLs are resolved against, e.g. `http://localhost:5173`.
        pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
            self.origin = Some(origin.into().trim_end_matches('/').to_string());
            self
        }

        fn absolute(&self, url: &str) -> Result<String, TransportError> {
            if !url.starts_with('/') {
                return Ok(url.to_string());
            }
            match &self.origin {
                Some(origin) => Ok(format!("{origin}{url}")),
                None => Err(TransportError::unroutable(format!(
                    "relative URL {url} needs a proxy origin"
                ))),
            }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = self.absolute(&request.url)?;
            let body = request.body.as_deref().map(str::as_bytes);

            let result = match request.method {
                HttpMethod::Get => with_headers(self.agent.get(&url), &request.headers).call(),
                HttpMethod::Head => with_headers(self.agent.head(&url), &request.headers).call(),
                HttpMethod::Delete => {
                    let builder = with_headers(self.agent.delete(&url), &request.headers);
                    match body {
                        Some(bytes) => builder.force_send_body().send(bytes),
                        None => builder.call(),
                    }
                }
                HttpMethod::Post => {
                    let builder = with_headers(self.agent.post(&url), &request.headers);
                    match body {
                        Some(bytes) => builder.send(bytes),
                        None => builder.send_empty(),
                    }
                }
                HttpMethod::Put => {
                    let builder = with_headers(self.agent.put(&url), &request.headers);
                    match body {
                        Some(bytes) => builder.send(bytes),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = if request.method == HttpMethod::Head {
                String::new()
            } else {
                match response
                    .body_mut()
                    .with_config()
                    .limit(MAX_BODY_BYTES)
                    .read_to_vec()
                {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    // The status alone classifies an error response.
                    Err(e) if !status.is_success() => {
                        warn!(status = status.as_u16(), %url, error = %e, "dropping unreadable error body");
                        String::new()
                    }
                    Err(e) => {
                        return Err(TransportError::body(format!(
                            "failed to read HTTP {} response body: {e}",
                            status.as_u16()
                        )))
                    }
                }
            };

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or_else(|| reason_phrase(status.as_u16()))
                    .to_string(),
                headers,
                body,
            })
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

}
