use serde::Serialize;

use super::{encode_segment, ResourceApi};
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Id, UserRole};

/// User roles: `/api/role`.
pub struct RoleService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> RoleService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::UserRole),
        }
    }

    pub fn all(&self) -> Result<Vec<UserRole>, ApiError> {
        self.api.list("")
    }

    pub fn by_id(&self, id: Id) -> Result<UserRole, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    /// Look up a role by type name; the name is upper-cased before sending.
    pub fn by_type(&self, role_type: &str) -> Result<UserRole, ApiError> {
        let role_type = role_type.to_uppercase();
        self.api
            .get(&format!("/type/{}", encode_segment(&role_type)))
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<UserRole, ApiError> {
        self.api.post("/", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<UserRole, ApiError> {
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
    use crate::config::{ApiConfig, Resource};
    use crate::error::ApiError;
    use crate::services::testing::client;
    use crate::types::RoleType;
    use crate::ApiClient;

    #[test]
    fn by_type_uppercases() {
        let c = client(MockTransport::replying(json_response(200, json!({"id": 2, "type": "FISHER"}))));
        let role = c.roles().by_type("fisher").unwrap();
        assert_eq!(role.role_type, RoleType::Fisher);
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/role/type/FISHER");
    }

    #[test]
    fn unset_endpoint_names_role_key() {
        let config = ApiConfig::default().with_endpoint(Resource::Catch, "http://localhost/api/catch");
        let c = ApiClient::new(config, MockTransport::default());
        let err = c.roles().all().unwrap_err();
        assert!(matches!(err, ApiError::MissingBaseUrl { key: "USER_ROLE_ENDPOINT", .. }));
        assert_eq!(c.transport().calls(), 0);
    }
}
