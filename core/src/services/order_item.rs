use serde::Serialize;

use super::ResourceApi;
use crate::client::ApiClient;
use crate::config::Resource;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Id, OrderItem};

/// Order items: `/api/order-item`.
pub struct OrderItemService<'a, T> {
    api: ResourceApi<'a, T>,
}

impl<'a, T: Transport> OrderItemService<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self {
            api: ResourceApi::new(client, Resource::OrderItem),
        }
    }

    pub fn all(&self) -> Result<Vec<OrderItem>, ApiError> {
        self.api.list("")
    }

    pub fn by_id(&self, id: Id) -> Result<OrderItem, ApiError> {
        self.api.get(&format!("/{id}"))
    }

    pub fn create<B: Serialize + ?Sized>(&self, input: &B) -> Result<OrderItem, ApiError> {
        self.api.post("", input)
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: Id, input: &B) -> Result<OrderItem, ApiError> {
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
    use crate::http::HttpResponse;
    use crate::services::testing::client;

    #[test]
    fn all_reads_nested_references() {
        let c = client(MockTransport::replying(json_response(
            200,
            json!([{"id": 1, "order": {"id": 100}, "fishCatch": {"id": 200, "price": 25.5}, "quantity": 5}]),
        )));
        let items = c.order_items().all().unwrap();
        assert_eq!(items[0].order.as_ref().unwrap().id, 100);
        assert_eq!(c.transport().last().url, "http://52.3.6.17:8080/api/order-item");
    }

    #[test]
    fn server_error_propagates_verbatim() {
        let c = client(MockTransport::replying(HttpResponse::new(500, "")));
        let err = c.order_items().by_id(1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "HTTP 500 Internal Server Error at http://52.3.6.17:8080/api/order-item/1"
        );
    }
}
