use serde::Serialize;

use super::{encode_segment, with_query, ResourceApi};
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Credentials, Id, Person, RoleType};

/// Persons and login: `/api/person`.
pub struct PersonService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> PersonService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::Person),
        }
    }

    pub fn all(&self) -> Result<Vec<Person>, ApiError> {
        self.api.list("")
    }

    /// Persons holding `role`.
    ///
    /// `role` must be exactly one of ADMIN, FISHER or CUSTOMER; anything else
    /// fails with `ApiError::Validation` without touching the network.
    pub fn by_role(&self, role: &str) -> Result<Vec<Person>, ApiError> {
        let role: RoleType = role.parse()?;
        self.by_role_type(role)
    }

    pub fn by_role_type(&self, role: RoleType) -> Result<Vec<Person>, ApiError> {
        self.api
            .list(&with_query("/roles", &[("role", Some(role.as_str()))]))
    }

    pub fn role_of(&self, id: Id) -> Result<RoleType, ApiError> {
        self.api.get(&format!("/{id}/role"))
    }

    pub fn by_id(&self, id: Id) -> Result<Person, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    pub fn by_username(&self, username: &str) -> Result<Person, ApiError> {
        self.api
            .get(&format!("/username/{}", encode_segment(username)))
    }

    pub fn login(&self, credentials: &Credentials) -> Result<Person, ApiError> {
        self.api.post("/login", credentials)
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<Person, ApiError> {
        self.api.post("", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<Person, ApiError> {
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
    use crate::types::{Credentials, RoleType};

    #[test]
    fn invalid_role_never_reaches_transport() {
        let c = client(MockTransport::default());
        let err = c.persons().by_role("NOT_A_ROLE").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("Valid roles are: ADMIN, FISHER, CUSTOMER"));
        assert_eq!(c.transport().calls(), 0);
    }

    #[test]
    fn valid_roles_issue_request() {
        let mock = MockTransport::default();
        for _ in RoleType::ALL {
            mock.push(Ok(json_response(200, json!([]))));
        }
        let c = client(mock);
        for role in ["ADMIN", "FISHER", "CUSTOMER"] {
            c.persons().by_role(role).unwrap();
            assert_eq!(
                c.transport().last().url,
                format!("http://52.3.6.17:8080/api/person/roles?role={role}")
            );
        }
        assert_eq!(c.transport().calls(), 3);
    }

    #[test]
    fn role_of_accepts_json_string_or_text() {
        let mock = MockTransport::default();
        mock.push(Ok(json_response(200, json!("ADMIN"))));
        mock.push(Ok(HttpResponse::new(200, "FISHER").with_header("content-type", "text/plain")));
        let c = client(mock);
        assert_eq!(c.persons().role_of(1).unwrap(), RoleType::Admin);
        assert_eq!(c.persons().role_of(2).unwrap(), RoleType::Fisher);
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/person/2/role");
    }

    #[test]
    fn login_posts_credentials() {
        let c = client(MockTransport::replying(json_response(200, json!({
            "id": 1, "username": "johndoe", "email": "john@example.com",
            "role": {"id": 3, "type": "CUSTOMER", "label": "Customer"}
        }))));
        let person = c
            .persons()
            .login(&Credentials::new("john@example.com", "password123"))
            .unwrap();
        assert_eq!(person.role.unwrap().role_type, RoleType::Customer);
        let req = c.transport().last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://52.3.6.17:8080/api/person/login");
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"email":"john@example.com","password":"password123"}"#)
        );
    }

    #[test]
    fn by_username_is_encoded() {
        let c = client(MockTransport::replying(json_response(200, json!({"id": 30, "username": "üser 1"}))));
        assert_eq!(c.persons().by_username("üser 1").unwrap().id, 30);
        assert_eq!(
            c.transport().last().url,
            "http://52.3.6.17:8080/api/person/username/%C3%BCser%201"
        );
    }
}
