use serde::Serialize;

use super::ResourceApi;
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Id, Species};

/// Species: `/api/species`.
pub struct SpeciesService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> SpeciesService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::Species),
        }
    }

    pub fn all(&self) -> Result<Vec<Species>, ApiError> {
        self.api.list("")
    }

    pub fn by_id(&self, id: Id) -> Result<Species, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<Species, ApiError> {
        self.api.post("", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<Species, ApiError> {
        self.api.put(&format!("/{id}"), input)
    }

    pub fn delete(&self, id: Id) -> Result<(), ApiError> {
        self.api.delete(&format!("/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::tests::{json_response, MockTransport};
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::services::testing::client;
    use crate::types::Species;

    #[test]
    fn all_parses_species_list() {
        let c = client(MockTransport::replying(json_response(
            200,
            json!([
                {"id": 1, "name": "Atlantic Salmon", "description": "A popular salmon species",
                 "imageUrl": "https://example.com/salmon.jpg", "infoLink": "https://example.com/salmon-info"},
                {"id": 2, "name": "Pacific Tuna"}
            ]),
        )));
        let species = c.species().all().unwrap();
        assert_eq!(species.len(), 2);
        assert_eq!(species[0].image_url.as_deref(), Some("https://example.com/salmon.jpg"));
        assert_eq!(species[1].description, None);
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/species");
    }

    #[test]
    fn empty_list_response_is_empty_vec() {
        let c = client(MockTransport::replying(HttpResponse::new(204, "")));
        assert!(c.species().all().unwrap().is_empty());
    }

    #[test]
    fn update_sends_typed_body() {
        let update = Species {
            id: 3,
            name: "Cod".to_string(),
            ..Species::default()
        };
        let c = client(MockTransport::replying(json_response(200, json!({"id": 3, "name": "Cod"}))));
        assert_eq!(c.species().update(3, &update).unwrap(), update);
        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://52.3.6.17:8080/api/species/3");
        assert_eq!(req.body.as_deref(), Some(r#"{"id":3,"name":"Cod"}"#));
    }

    #[test]
    fn by_id_on_empty_body_is_an_error() {
        let c = client(MockTransport::replying(HttpResponse::new(200, "")));
        assert!(matches!(c.species().by_id(1), Err(ApiError::Deserialization(_))));
    }
}
