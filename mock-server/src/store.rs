//! In-memory marketplace state and its JSON views.
//!
//! Entities reference each other by id; views expand those ids into nested
//! objects the way the real backend renders them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type Id = i64;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_link: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Landing {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub id: Id,
    #[serde(rename = "type")]
    pub role_type: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Person {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_id: Id,
}

#[derive(Clone, Debug)]
pub struct Fisher {
    pub id: Id,
    pub person_id: Option<Id>,
    pub fishing_license_number: String,
}

#[derive(Clone, Debug)]
pub struct Catch {
    pub id: Id,
    pub species_id: Id,
    pub fisher_id: Id,
    pub landing_id: Id,
    pub quantity_in_kg: f64,
    pub price: f64,
    pub available: bool,
    pub sold: bool,
    pub expired: bool,
    pub time_stamp: Option<String>,
    pub pickup_time: Option<String>,
    pub pickup_instructions: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Order {
    pub id: Id,
    pub customer_id: Option<Id>,
    pub order_status: String,
    pub order_date_time: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OrderItem {
    pub id: Id,
    pub order_id: Option<Id>,
    pub catch_id: Option<Id>,
    pub quantity: f64,
}

#[derive(Debug, Default)]
pub struct Store {
    pub species: BTreeMap<Id, Species>,
    pub landings: BTreeMap<Id, Landing>,
    pub roles: BTreeMap<Id, Role>,
    pub persons: BTreeMap<Id, Person>,
    pub fishers: BTreeMap<Id, Fisher>,
    pub catches: BTreeMap<Id, Catch>,
    pub orders: BTreeMap<Id, Order>,
    pub order_items: BTreeMap<Id, OrderItem>,
    next_id: Id,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    pub id: Id,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FisherView {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<PersonView>,
    pub fishing_license_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchView {
    pub id: Id,
    pub species: Option<Species>,
    pub fisher: Option<FisherView>,
    pub landing: Option<Landing>,
    pub available: bool,
    pub quantity_in_kg: f64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(rename = "pickup_instructions", skip_serializing_if = "Option::is_none")]
    pub pickup_instructions: Option<String>,
}

#[derive(Serialize)]
pub struct IdRef {
    pub id: Id,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<IdRef>,
    pub fish_catch: Option<CatchView>,
    pub quantity: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date_time: Option<String>,
    pub order_status: String,
    pub customer: Option<PersonView>,
    pub order_items: Vec<OrderItemView>,
}

impl Store {
    pub fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    pub fn person_view(&self, person: &Person) -> PersonView {
        PersonView {
            id: person.id,
            username: person.username.clone(),
            email: person.email.clone(),
            role: self.roles.get(&person.role_id).cloned(),
        }
    }

    pub fn fisher_view(&self, fisher: &Fisher) -> FisherView {
        FisherView {
            id: fisher.id,
            person: fisher
                .person_id
                .and_then(|id| self.persons.get(&id))
                .map(|p| self.person_view(p)),
            fishing_license_number: fisher.fishing_license_number.clone(),
        }
    }

    pub fn catch_view(&self, c: &Catch) -> CatchView {
        CatchView {
            id: c.id,
            species: self.species.get(&c.species_id).cloned(),
            fisher: self.fishers.get(&c.fisher_id).map(|f| self.fisher_view(f)),
            landing: self.landings.get(&c.landing_id).cloned(),
            available: c.available,
            quantity_in_kg: c.quantity_in_kg,
            price: c.price,
            time_stamp: c.time_stamp.clone(),
            pickup_time: c.pickup_time.clone(),
            pickup_instructions: c.pickup_instructions.clone(),
        }
    }

    pub fn order_item_view(&self, item: &OrderItem) -> OrderItemView {
        OrderItemView {
            id: item.id,
            order: item.order_id.map(|id| IdRef { id }),
            fish_catch: item
                .catch_id
                .and_then(|id| self.catches.get(&id))
                .map(|c| self.catch_view(c)),
            quantity: item.quantity,
        }
    }

    pub fn order_view(&self, order: &Order) -> OrderView {
        OrderView {
            id: order.id,
            order_date_time: order.order_date_time.clone(),
            order_status: order.order_status.clone(),
            customer: order
                .customer_id
                .and_then(|id| self.persons.get(&id))
                .map(|p| self.person_view(p)),
            order_items: self
                .order_items
                .values()
                .filter(|i| i.order_id == Some(order.id))
                .map(|i| OrderItemView {
                    order: None,
                    ..self.order_item_view(i)
                })
                .collect(),
        }
    }

    pub fn catches_where(&self, keep: impl Fn(&Catch) -> bool) -> Vec<CatchView> {
        self.catches
            .values()
            .filter(|c| keep(c))
            .map(|c| self.catch_view(c))
            .collect()
    }

    pub fn species_named(&self, name: &str) -> Option<Id> {
        self.species
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.id)
    }

    pub fn landing_named(&self, name: &str) -> Option<Id> {
        self.landings
            .values()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .map(|l| l.id)
    }

    /// A sold or expired catch is never available.
    pub fn refresh_availability(&mut self) {
        for c in self.catches.values_mut() {
            c.available = !c.sold && !c.expired;
        }
    }

    /// Sample marketplace used by `app()`.
    pub fn seeded() -> Self {
        let mut store = Store::default();

        for (id, role_type, label) in [
            (1, "ADMIN", "Administrator"),
            (2, "FISHER", "Fisher"),
            (3, "CUSTOMER", "Customer"),
        ] {
            store.roles.insert(
                id,
                Role {
                    id,
                    role_type: role_type.to_string(),
                    label: Some(label.to_string()),
                    description: Some(format!("{label} role")),
                },
            );
        }

        for (id, username, email, password, role_id) in [
            (1, "admin", "admin@fishcatch.com", "secureAdminPass", 1),
            (2, "olafisher", "ola@fishcatch.com", "nets4life", 2),
            (3, "kari", "kari@example.com", "password123", 3),
            (4, "john doe", "john@example.com", "hunter22", 3),
        ] {
            store.persons.insert(
                id,
                Person {
                    id,
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role_id,
                },
            );
        }

        store.fishers.insert(
            1,
            Fisher {
                id: 1,
                person_id: Some(2),
                fishing_license_number: "LIC-1001".to_string(),
            },
        );

        for (id, name, description) in [
            (1, "Cod", "A popular commercial fish"),
            (2, "Atlantic Salmon", "A popular salmon species"),
            (3, "Pacific Tuna", "A large ocean fish"),
        ] {
            store.species.insert(
                id,
                Species {
                    id,
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    image_url: None,
                    info_link: None,
                },
            );
        }

        for (id, name, address) in [(1, "Port Alpha", "North Coast"), (2, "Port Beta", "South Coast")] {
            store.landings.insert(
                id,
                Landing {
                    id,
                    name: name.to_string(),
                    address: Some(address.to_string()),
                },
            );
        }

        // (id, species, landing, kg, price, sold, expired)
        for (id, species_id, landing_id, kg, price, sold, expired) in [
            (1, 1, 1, 120.0, 8.5, false, false),
            (2, 2, 2, 40.0, 15.99, false, false),
            (3, 3, 1, 15.0, 25.5, false, true),
            (4, 1, 2, 30.0, 9.0, true, false),
        ] {
            store.catches.insert(
                id,
                Catch {
                    id,
                    species_id,
                    fisher_id: 1,
                    landing_id,
                    quantity_in_kg: kg,
                    price,
                    available: !sold && !expired,
                    sold,
                    expired,
                    time_stamp: Some("2025-05-26T10:00:00".to_string()),
                    pickup_time: None,
                    pickup_instructions: None,
                },
            );
        }

        store.orders.insert(
            1,
            Order {
                id: 1,
                customer_id: Some(3),
                order_status: "DELIVERED".to_string(),
                order_date_time: Some("2025-01-10T12:00:00".to_string()),
            },
        );
        store.order_items.insert(
            1,
            OrderItem {
                id: 1,
                order_id: Some(1),
                catch_id: Some(4),
                quantity: 10.0,
            },
        );

        store.next_id = 100;
        store
    }
}
