use serde::Serialize;

use super::ResourceApi;
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Id, Landing};

/// Landings: `/api/landing`.
pub struct LandingService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> LandingService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::Landing),
        }
    }

    pub fn all(&self) -> Result<Vec<Landing>, ApiError> {
        self.api.list("")
    }

    pub fn by_id(&self, id: Id) -> Result<Landing, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<Landing, ApiError> {
        self.api.post("", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<Landing, ApiError> {
        self.api.put(&format!("/{id}"), input)
    }

    pub fn delete(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/{id}"))
    }
}
