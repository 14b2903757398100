//! The shared request adapter used by every resource service.
//!
//! # Design
//! `ApiClient` keeps the build/parse split: `build` turns an endpoint, a
//! relative path and `RequestOptions` into an `HttpRequest` without I/O, and
//! `classify` turns an `HttpResponse` into an `Outcome` or a typed error.
//! `request` glues the two halves around a `Transport`. The client holds
//! only immutable configuration, so one instance can serve any number of
//! concurrent calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::{ApiConfig, Endpoint, Resource};
use crate::error::{ApiError, HTML_SNIPPET_CHARS};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resolve::UrlResolver;
use crate::transport::{Transport, TransportError, TransportErrorKind};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Method, extra headers and body for a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn put() -> Self {
        Self::with_method(HttpMethod::Put)
    }

    pub fn delete() -> Self {
        Self::with_method(HttpMethod::Delete)
    }

    pub fn post_json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        Ok(Self::with_method(HttpMethod::Post).with_body(to_json(body)?))
    }

    pub fn put_json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        Ok(Self::with_method(HttpMethod::Put).with_body(to_json(body)?))
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A parsed JSON payload.
    Json(Value),
    /// 204, or a 2xx with an empty non-JSON body.
    Empty,
    /// A 2xx body that was neither declared nor parseable as JSON.
    Text { body: String, content_type: String },
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Outcome::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Deserialize the payload into `T`.
    ///
    /// An empty outcome is offered to `T` as JSON `null` and raw text as a
    /// JSON string, so `()`, `Option<_>` and `String` targets accept them.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Outcome::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            Outcome::Empty => serde_json::from_value(Value::Null).map_err(|_| {
                ApiError::Deserialization("expected a JSON payload, got an empty response".into())
            }),
            Outcome::Text { body, content_type } => serde_json::from_value(Value::String(body))
                .map_err(|_| {
                    ApiError::Deserialization(format!(
                        "expected a JSON payload, got non-JSON content (Content-Type: \"{}\")",
                        display_content_type(&content_type)
                    ))
                }),
        }
    }

    /// Like `into_typed`, but an empty outcome becomes `None`.
    pub fn into_optional<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        match self {
            Outcome::Empty => Ok(None),
            other => other.into_typed().map(Some),
        }
    }
}

/// Join `path` onto `base` with exactly one slash between them.
///
/// Trailing slashes of the base and leading slashes of the path collapse into
/// one. An empty path returns the base with its trailing slashes removed.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{}", path.trim_start_matches('/'))
}

fn transport_failure(url: &str, e: TransportError) -> ApiError {
    match e.kind {
        TransportErrorKind::Connection => {
            error!(%url, error = %e, "network error");
            ApiError::Network {
                url: url.to_string(),
                message: e.message,
            }
        }
        TransportErrorKind::Unroutable => ApiError::MissingProxyOrigin {
            url: url.to_string(),
        },
        TransportErrorKind::Body => {
            error!(%url, error = %e, "unreadable response body");
            ApiError::Deserialization(format!("{} from {url}", e.message))
        }
    }
}

/// Check that a base URL is present and usable.
pub fn validate_base_url<'a>(endpoint: &'a Endpoint, path: &str) -> Result<&'a str, ApiError> {
    let base = endpoint
        .base_url
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| ApiError::MissingBaseUrl {
            key: endpoint.key,
            path: path.to_string(),
        })?;

    let lower = base.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || base.starts_with('/') {
        Ok(base)
    } else {
        Err(ApiError::InvalidBaseUrl {
            base_url: base.to_string(),
        })
    }
}

/// True when the body opens like an HTML document.
pub fn looks_like_html(body: &str) -> bool {
    let Some(rest) = body.trim_start().strip_prefix('<') else {
        return false;
    };
    let rest = rest.trim_start().to_ascii_lowercase();
    rest.starts_with("!doctype") || rest.starts_with("html")
}

fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(JSON_CONTENT_TYPE)
}

fn display_content_type(content_type: &str) -> &str {
    if content_type.is_empty() {
        "unknown"
    } else {
        content_type
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

pub struct ApiClient<T> {
    config: Arc<ApiConfig>,
    resolver: Arc<dyn UrlResolver>,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client whose URL resolver follows `config.url_mode`.
    pub fn new(config: impl Into<Arc<ApiConfig>>, transport: T) -> Self {
        let config = config.into();
        let resolver = config.url_mode.resolver();
        Self {
            config,
            resolver,
            transport,
        }
    }

    /// Replace the URL resolver chosen from configuration.
    pub fn with_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoint(&self, resource: Resource) -> Endpoint {
        self.config.endpoint(resource)
    }

    /// Produce the request without performing any I/O.
    pub fn build(
        &self,
        endpoint: &Endpoint,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let base = validate_base_url(endpoint, path)?;
        let method = options.method;

        if options.body.is_some() && !method.allows_body() {
            return Err(ApiError::Validation(format!(
                "a request body is not allowed with {method}"
            )));
        }

        let mut headers = options.headers;
        if !has_header(&headers, "accept") {
            headers.push(("Accept".to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        if options.body.is_some() && !has_header(&headers, "content-type") {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        let url = join_url(&self.resolver.resolve_base(base), path);

        Ok(HttpRequest {
            method,
            url,
            headers,
            body: options.body,
        })
    }

    /// Turn a response into an outcome or a classified error.
    pub fn classify(&self, request: &HttpRequest, response: HttpResponse) -> Result<Outcome, ApiError> {
        let url = &request.url;
        let content_type = response.content_type().to_string();

        if self.config.debug {
            info!(status = response.status, content_type = %content_type, %url, "api response");
        }

        if !response.is_success() {
            if looks_like_html(&response.body) {
                return Err(ApiError::UnexpectedContentType {
                    status: response.status,
                    url: url.clone(),
                    snippet: response.body.chars().take(HTML_SNIPPET_CHARS).collect(),
                });
            }
            return Err(ApiError::HttpStatus {
                status: response.status,
                status_text: response.status_text,
                url: url.clone(),
                body: response.body,
            });
        }

        if response.status == 204 {
            return Ok(Outcome::Empty);
        }

        if is_json_content_type(&content_type) {
            return serde_json::from_str(&response.body)
                .map(Outcome::Json)
                .map_err(|e| ApiError::Deserialization(format!("invalid JSON from {url}: {e}")));
        }

        let body = response.body;
        if body.is_empty() {
            return Ok(Outcome::Empty);
        }

        // Some servers omit the JSON content type on JSON bodies.
        match serde_json::from_str(&body) {
            Ok(value) => {
                warn!(
                    %url,
                    content_type = display_content_type(&content_type),
                    "JSON body without a JSON content type"
                );
                Ok(Outcome::Json(value))
            }
            Err(_) => {
                warn!(
                    %url,
                    content_type = display_content_type(&content_type),
                    "non-JSON response, returning text"
                );
                Ok(Outcome::Text { body, content_type })
            }
        }
    }

    /// Build, execute and classify a single call.
    pub fn request(
        &self,
        endpoint: &Endpoint,
        path: &str,
        options: RequestOptions,
    ) -> Result<Outcome, ApiError> {
        let request = self.build(endpoint, path, options)?;

        if self.config.debug {
            info!(
                method = %request.method,
                url = %request.url,
                body = request.body.as_deref().unwrap_or(""),
                headers = ?request.headers,
                "api request"
            );
        }

        let response = self
            .transport
            .execute(&request)
            .map_err(|e| transport_failure(&request.url, e))?;

        self.classify(&request, response)
    }

    /// `request` against the configured endpoint of `resource`.
    pub fn request_resource(
        &self,
        resource: Resource,
        path: &str,
        options: RequestOptions,
    ) -> Result<Outcome, ApiError> {
        self.request(&self.endpoint(resource), path, options)
    }
}
