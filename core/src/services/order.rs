use serde::Serialize;

use super::{encode_segment, ResourceApi};
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Id, Order};

/// Orders: `/api/order`.
pub struct OrderService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> OrderService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::Order),
        }
    }

    pub fn all(&self) -> Result<Vec<Order>, ApiError> {
        self.api.list("")
    }

    pub fn by_id(&self, id: Id) -> Result<Order, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    /// Orders placed by the customer with `username`.
    pub fn by_customer(&self, username: &str) -> Result<Vec<Order>, ApiError> {
        self.api
            .list(&format!("/customer/{}", encode_segment(username)))
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<Order, ApiError> {
        self.api.post("/", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<Order, ApiError> {
        self.api.put(&format!("/{id}"), input)
    }

    pub fn delete(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/{id}"))
    }
}
