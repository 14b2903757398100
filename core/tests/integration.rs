//! End-to-end tests against the live mock backend.
//!
//! # Design
//! Starts the mock server on a random port, then drives the resource services
//! over real HTTP through `UreqTransport`. Validates that request building and
//! response classification agree with an actual server.

use std::net::SocketAddr;

use fishcatch_core::{
    ApiClient, ApiConfig, ApiError, CatchFilters, CatchForm, CatchSearch, Credentials, Endpoint,
    FilterOptions, NewCatch, Outcome, RequestOptions, RoleType, UreqTransport, UrlMode,
};
use serde_json::json;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr) -> ApiClient<UreqTransport> {
    let config = ApiConfig::default().with_api_root(&format!("http://{addr}"));
    ApiClient::new(config, UreqTransport::new())
}

#[test]
fn catch_lifecycle() {
    let addr = start_server();
    let client = client(addr);
    let catches = client.catches();

    let before = catches.all().unwrap();
    assert_eq!(before.len(), 4);

    let created = catches
        .create(&NewCatch {
            species_id: 1,
            fisher_id: 1,
            landing_id: 2,
            quantity_in_kg: 12.5,
            price: 9.75,
            pickup_instructions: Some("Ring the bell".to_string()),
            ..NewCatch::default()
        })
        .unwrap();
    assert!(created.available);
    assert_eq!(created.species.as_ref().unwrap().name, "Cod");
    assert_eq!(created.pickup_instructions.as_deref(), Some("Ring the bell"));
    let id = created.id;

    let fetched = catches.by_id(id).unwrap();
    assert_eq!(fetched, created);

    let updated = catches.update(id, &json!({ "price": 11.0 })).unwrap();
    assert_eq!(updated.price, 11.0);
    assert_eq!(updated.quantity_in_kg, 12.5);

    catches.delete(id).unwrap();

    let err = catches.by_id(id).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.to_string(),
        format!("HTTP 404 Not Found at http://{addr}/api/catch/{id}, body: Catch {id} not found")
    );
}

#[test]
fn search_and_filter_options() {
    let addr = start_server();
    let client = client(addr);

    let options = FilterOptions::fetch(&client).unwrap();
    assert_eq!(options.species.len(), 3);
    assert_eq!(options.landings.len(), 2);
    assert_eq!(options.fishers.len(), 1);

    let mut filters = CatchFilters::default();
    filters.set("species", "Cod");
    let search = CatchSearch::new();
    let found = search.search(&client, &filters).unwrap().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    filters.set("landing", "Port Beta");
    let found = search.search(&client, &filters).unwrap().unwrap();
    assert!(found.is_empty());

    let everything = client.catches().search(None, None).unwrap();
    assert_eq!(everything.len(), 2);

    let by_name = client.catches().by_species_name("Atlantic Salmon").unwrap();
    assert_eq!(by_name[0].id, 2);
}

#[test]
fn form_submission_round_trip() {
    let addr = start_server();
    let client = client(addr);
    let options = FilterOptions::fetch(&client).unwrap();

    let form = CatchForm {
        species_id: "3".to_string(),
        fisher_id: "1".to_string(),
        landing_id: "2".to_string(),
        quantity_in_kg: "7.5".to_string(),
        price_per_kg: "21".to_string(),
    };
    let new_catch = form.validate(&options).unwrap();
    let created = client.catches().create(&new_catch).unwrap();
    assert_eq!(created.landing.unwrap().name, "Port Beta");
    assert_eq!(created.price, 21.0);
}

#[test]
fn fisher_catch_views() {
    let addr = start_server();
    let client = client(addr);
    let fishers = client.fishers();

    let fisher = fishers.by_id(1).unwrap();
    assert_eq!(fisher.fishing_license_number.as_deref(), Some("LIC-1001"));
    assert_eq!(fishers.catches(1).unwrap().len(), 4);
    assert_eq!(fishers.sold_catches(1).unwrap()[0].id, 4);
    assert_eq!(fishers.expired_catches(1).unwrap()[0].id, 3);
}

#[test]
fn persons_roles_and_login() {
    let addr = start_server();
    let client = client(addr);
    let persons = client.persons();

    let customers = persons.by_role("CUSTOMER").unwrap();
    let names: Vec<&str> = customers.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(names, vec!["kari", "john doe"]);

    let err = persons.by_role("customer").unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert_eq!(persons.role_of(2).unwrap(), RoleType::Fisher);
    assert_eq!(persons.by_username("john doe").unwrap().id, 4);

    let admin = persons
        .login(&Credentials::new("admin@fishcatch.com", "secureAdminPass"))
        .unwrap();
    assert_eq!(admin.role.unwrap().role_type, RoleType::Admin);

    let err = persons
        .login(&Credentials::new("admin@fishcatch.com", "nope"))
        .unwrap_err();
    assert_eq!(err.status(), Some(401));

    let role = client.roles().by_type("fisher").unwrap();
    assert_eq!(role.id, 2);
}

#[test]
fn orders_and_refresh() {
    let addr = start_server();
    let client = client(addr);

    let orders = client.orders().by_customer("kari").unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_items[0].fish_catch.as_ref().unwrap().id, 4);

    let order = client
        .orders()
        .create(&json!({
            "customer": { "id": 4 },
            "orderItems": [{ "fishCatch": { "id": 1 }, "quantity": 2 }]
        }))
        .unwrap();
    assert_eq!(order.order_items.len(), 1);

    let outcome = client.catches().refresh_availability().unwrap();
    assert_eq!(outcome, Outcome::Empty);
    let available = client.catches().available().unwrap();
    let ids: Vec<i64> = available.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn html_error_page_is_unexpected_content_type() {
    let addr = start_server();
    let client = client(addr);
    let endpoint = Endpoint::new("CATCH_ENDPOINT", format!("http://{addr}/html-error"));

    let err = client
        .request(&endpoint, "", RequestOptions::get())
        .unwrap_err();
    match err {
        ApiError::UnexpectedContentType { status, snippet, .. } => {
            assert_eq!(status, 502);
            assert!(snippet.starts_with("<!DOCTYPE html>"));
        }
        other => panic!("expected UnexpectedContentType, got {other:?}"),
    }
}

#[test]
fn closed_port_is_network_error() {
    let unused = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = unused.local_addr().unwrap();
    drop(unused);

    let err = client(addr).species().all().unwrap_err();
    match &err {
        ApiError::Network { url, .. } => {
            assert_eq!(url, &format!("http://{addr}/api/species"));
        }
        other => panic!("expected Network, got {other:?}"),
    }
    assert!(err.to_string().contains("Original error:"));
}

#[test]
fn dev_proxy_resolves_against_origin() {
    let addr = start_server();
    let config = ApiConfig::default()
        // Unroutable host: only the path survives the rewrite.
        .with_api_root("http://10.255.255.1:9")
        .with_url_mode(UrlMode::DevProxy);
    let client = ApiClient::new(config, UreqTransport::new().with_origin(format!("http://{addr}")));

    let species = client.species().all().unwrap();
    assert_eq!(species[0].name, "Cod");
}
