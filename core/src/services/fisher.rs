use serde::Serialize;

use super::ResourceApi;
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Catch, Fisher, Id};

/// Fishers: `/api/fisher`. Individual fishers live under `/fisher/{id}`.
pub struct FisherService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> FisherService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::Fisher),
        }
    }

    pub fn all(&self) -> Result<Vec<Fisher>, ApiError> {
        self.api.list("")
    }

    pub fn by_id(&self, id: Id) -> Result<Fisher, ApiError> {
        self.api.get(&format!("/fisher/{id}"))
    }

    pub fn catches(&self, id: Id) -> Result<Vec<Catch>, ApiError> {
        self.api.list(&format!("/fisher/{id}/catches"))
    }

    /// Catches past their sale window that were never sold.
    pub fn expired_catches(&self, id: Id) -> Result<Vec<Catch>, ApiError> {
        self.api.list(&format!("/fisher/{id}/catches/expired"))
    }

    pub fn sold_catches(&self, id: Id) -> Result<Vec<Catch>, ApiError> {
        self.api.list(&format!("/fisher/{id}/catches/sold"))
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<Fisher, ApiError> {
        self.api.post("/fisher", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<Fisher, ApiError> {
        self.api.put(&format!("/fisher/{id}"), input)
    }

    pub fn delete(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/fisher/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::tests::{json_response, MockTransport};
    use crate::http::{HttpMethod, HttpResponse};
    use crate::services::testing::client;

    #[test]
    fn by_id_uses_fisher_prefix() {
        let c = client(MockTransport::replying(json_response(
            200,
            json!({"id": 123, "person": {"id": 456, "username": "testfisher"}, "fishingLicenseNumber": "LIC123"}),
        )));
        let fisher = c.fishers().by_id(123).unwrap();
        assert_eq!(fisher.fishing_license_number.as_deref(), Some("LIC123"));
        assert_eq!(fisher.person.unwrap().username, "testfisher");
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/fisher/fisher/123");
    }

    #[test]
    fn catch_history_paths() {
        let mock = MockTransport::default();
        for _ in 0..3 {
            mock.push(Ok(json_response(200, json!([]))));
        }
        let c = client(mock);
        let fishers = c.fishers();
        fishers.catches(0).unwrap();
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/fisher/fisher/0/catches");
        fishers.expired_catches(5).unwrap();
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/fisher/fisher/5/catches/expired");
        fishers.sold_catches(5).unwrap();
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/fisher/fisher/5/catches/sold");
    }

    #[test]
    fn create_update_delete() {
        let mock = MockTransport::default();
        mock.push(Ok(json_response(201, json!({"id": 1, "fishingLicenseNumber": "NEW"}))));
        mock.push(Ok(json_response(200, json!({"id": 1, "fishingLicenseNumber": "UPD"}))));
        mock.push(Ok(HttpResponse::new(204, "")));
        let c = client(mock);

        let created = c.fishers().create(&json!({"fishingLicenseNumber": "NEW"})).unwrap();
        assert_eq!(created.id, 1);
        let req = c.transport().last();
        assert_eq!((req.method, req.url.as_str()), (HttpMethod::Post, "http://52.3.6.17:8080/api/fisher/fisher"));

        c.fishers().update(1, &json!({"fishingLicenseNumber": "UPD"})).unwrap();
        assert_eq!(c.transport().last().method, HttpMethod::Put);

        c.fishers().delete(1).unwrap();
        let req = c.transport().last();
        assert_eq!((req.method, req.url.as_str()), (HttpMethod::Delete, "http://52.3.6.17:8080/api/fisher/fisher/1"));
    }
}
