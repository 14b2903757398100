//! Typed wrappers for each backend resource.
//!
//! Every operation picks a method, a path and an optional body, then delegates
//! to `ApiClient::request`. Failures propagate unchanged; the only local logic
//! is path-segment encoding, optional query parameters and role validation.

mod catch;
mod fisher;
mod landing;
mod order;
mod order_item;
mod person;
mod role;
mod species;

pub use catch::CatchService;
pub use fisher::FisherService;
pub use landing::LandingService;
pub use order::OrderService;
pub use order_item::OrderItemService;
pub use person::PersonService;
pub use role::RoleService;
pub use species::SpeciesService;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::{ApiClient, Outcome, RequestOptions};
use crate::config::{Endpoint, Resource};
use crate::error::ApiError;
use crate::transport::Transport;

/// Characters left intact by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a user-supplied path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}

/// `path?k=v&...` with only the parameters that are present and non-empty.
pub fn with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for &(key, value) in params {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            query.append_pair(key, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", query.finish())
    } else {
        path.to_string()
    }
}

/// One resource's endpoint bound to the shared client.
pub(crate) struct ResourceApi<'a, T> {
    client: &'a ApiClient<T>,
    endpoint: Endpoint,
}

impl<'a, T: Transport> ResourceApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>, resource: Resource) -> Self {
        Self {
            client,
            endpoint: client.endpoint(resource),
        }
    }

    pub(crate) fn call(&self, path: &str, options: RequestOptions) -> Result<Outcome, ApiError> {
        self.client.request(&self.endpoint, path, options)
    }

    pub(crate) fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(path, RequestOptions::get())?.into_typed()
    }

    /// GET a collection; an empty response is an empty list.
    pub(crate) fn list<R: DeserializeOwned>(&self, path: &str) -> Result<Vec<R>, ApiError> {
        Ok(self
            .call(path, RequestOptions::get())?
            .into_optional()?
            .unwrap_or_default())
    }

    pub(crate) fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(path, RequestOptions::post_json(body)?)?.into_typed()
    }

    pub(crate) fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(path, RequestOptions::put_json(body)?)?.into_typed()
    }

    pub(crate) fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call(path, RequestOptions::delete()).map(|_| ())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn catches(&self) -> CatchService<'_, T> {
        CatchService::new(self)
    }

    pub fn fishers(&self) -> FisherService<'_, T> {
        FisherService::new(self)
    }

    pub fn species(&self) -> SpeciesService<'_, T> {
        SpeciesService::new(self)
    }

    pub fn landings(&self) -> LandingService<'_, T> {
        LandingService::new(self)
    }

    pub fn orders(&self) -> OrderService<'_, T> {
        OrderService::new(self)
    }

    pub fn order_items(&self) -> OrderItemService<'_, T> {
        OrderItemService::new(self)
    }

    pub fn persons(&self) -> PersonService<'_, T> {
        PersonService::new(self)
    }

    pub fn roles(&self) -> RoleService<'_, T> {
        RoleService::new(self)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::client::tests::MockTransport;
    use crate::client::ApiClient;
    use crate::config::ApiConfig;

    pub(crate) const API_ROOT: &str = "http://52.3.6.17:8080";

    pub(crate) fn client(mock: MockTransport) -> ApiClient<MockTransport> {
        ApiClient::new(ApiConfig::default().with_api_root(API_ROOT), mock)
    }
}
