//! Domain DTOs for the FishCatch API.
//!
//! # Design
//! The backend nests related entities partially (an order item may carry just
//! `{"id": 100}` for its order), so read DTOs default every missing field
//! instead of failing the whole payload. Write payloads only serialize what the
//! caller set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub type Id = i64;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Species {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
}

/// A port where catches are brought ashore.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Landing {
    pub id: Id,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// The closed set of user role types.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleType {
    Admin,
    Fisher,
    #[default]
    Customer,
}

impl RoleType {
    pub const ALL: [RoleType; 3] = [RoleType::Admin, RoleType::Fisher, RoleType::Customer];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleType::Admin => "ADMIN",
            RoleType::Fisher => "FISHER",
            RoleType::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleType {
    type Err = ApiError;

    /// Exact match only; callers normalise case before validating.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleType::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = RoleType::ALL.iter().map(|r| r.as_str()).collect();
                ApiError::Validation(format!(
                    "Invalid role type: {s}. Valid roles are: {}",
                    valid.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRole {
    pub id: Id,
    #[serde(rename = "type")]
    pub role_type: RoleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    pub id: Id,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Fisher {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fishing_license_number: Option<String>,
}

/// A recorded catch offered for sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Catch {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fisher: Option<Fisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing: Option<Landing>,
    pub available: bool,
    pub quantity_in_kg: f64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(
        rename = "pickup_instructions",
        alias = "pickupInstructions",
        skip_serializing_if = "Option::is_none"
    )]
    pub pickup_instructions: Option<String>,
}

/// Payload for recording a new catch. The backend expects ids, not names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCatch {
    pub species_id: Id,
    pub fisher_id: Id,
    pub landing_id: Id,
    pub quantity_in_kg: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(
        default,
        rename = "pickup_instructions",
        skip_serializing_if = "Option::is_none"
    )]
    pub pickup_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Person>,
    pub order_items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Box<Order>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fish_catch: Option<Catch>,
    pub quantity: f64,
}

/// Login payload.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_nested_entities_deserialize() {
        let item: OrderItem = serde_json::from_value(json!({
            "id": 1,
            "order": {"id": 100},
            "fishCatch": {"id": 200, "price": 25.5},
            "quantity": 5
        }))
        .unwrap();
        assert_eq!(item.order.unwrap().id, 100);
        let fish_catch = item.fish_catch.unwrap();
        assert_eq!(fish_catch.price, 25.5);
        assert!(!fish_catch.available);
        assert_eq!(item.quantity, 5.0);
    }

    #[test]
    fn catch_reads_camel_case_fields() {
        let c: Catch = serde_json::from_value(json!({
            "id": 1,
            "species": {"name": "Salmon"},
            "available": true,
            "quantityInKg": 2.5,
            "price": 15.99,
            "pickupInstructions": "Paid already"
        }))
        .unwrap();
        assert_eq!(c.species.unwrap().name, "Salmon");
        assert_eq!(c.quantity_in_kg, 2.5);
        assert_eq!(c.pickup_instructions.as_deref(), Some("Paid already"));
    }

    #[test]
    fn new_catch_serializes_only_set_fields() {
        let payload = NewCatch {
            species_id: 1,
            fisher_id: 2,
            landing_id: 3,
            quantity_in_kg: 12.5,
            price: 8.0,
            ..NewCatch::default()
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"speciesId": 1, "fisherId": 2, "landingId": 3, "quantityInKg": 12.5, "price": 8.0})
        );
    }

    #[test]
    fn role_type_is_exact_closed_set() {
        assert_eq!("FISHER".parse::<RoleType>().unwrap(), RoleType::Fisher);
        let err = "fisher".parse::<RoleType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid role type: fisher. Valid roles are: ADMIN, FISHER, CUSTOMER"
        );
    }

    #[test]
    fn user_role_uses_type_key() {
        let role: UserRole = serde_json::from_value(json!({
            "id": 1, "type": "ADMIN", "label": "Administrator", "extra": true
        }))
        .unwrap();
        assert_eq!(role.role_type, RoleType::Admin);
        assert_eq!(role.label.as_deref(), Some("Administrator"));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("john@example.com", "password123");
        let debug = format!("{creds:?}");
        assert!(debug.contains("john@example.com"));
        assert!(!debug.contains("password123"));
    }
}
