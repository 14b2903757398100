use serde::Serialize;

use super::{encode_segment, with_query, ResourceApi};
use crate::client::{ApiClient, Outcome, RequestOptions};
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Catch, Id};

/// Catches: `/api/catch`.
pub struct CatchService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> CatchService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::Catch),
        }
    }

    pub fn all(&self) -> Result<Vec<Catch>, ApiError> {
        self.api.list("")
    }

    /// Catches still open for sale.
    pub fn available(&self) -> Result<Vec<Catch>, ApiError> {
        self.api.list("/available")
    }

    pub fn by_id(&self, id: Id) -> Result<Catch, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    pub fn by_species_name(&self, name: &str) -> Result<Vec<Catch>, ApiError> {
        self.api.list(&format!("/species/{}", encode_segment(name)))
    }

    /// Available catches filtered by species and/or landing name.
    pub fn search(
        &self,
        species_name: Option<&str>,
        landing_name: Option<&str>,
    ) -> Result<Vec<Catch>, ApiError> {
        let path = with_query(
            "/search",
            &[("speciesName", species_name), ("landingName", landing_name)],
        );
        self.api.list(&path)
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<Catch, ApiError> {
        self.api.post("", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<Catch, ApiError> {
        self.api.put(&format!("/{id}"), input)
    }

    /// Ask the backend to re-evaluate availability of every catch.
    pub fn refresh_availability(&self) -> Result<Outcome, ApiError> {
        self.api.call("/refresh", RequestOptions::put())
    }

    pub fn delete(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/{id}"))
    }
}
