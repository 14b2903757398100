//! In-memory FishCatch backend.
//!
//! Serves every `/api/...` route the client library calls, seeded with a
//! small marketplace, plus `/html-error` which answers 502 with an HTML page.

pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

use store::{
    Catch, CatchView, Fisher, FisherView, Id, Landing, Order, OrderItem, OrderItemView, OrderView,
    Person, PersonView, Role, Species, Store,
};

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

type ApiResult<T> = Result<T, ServerError>;

fn missing(what: &str, id: impl std::fmt::Display) -> ServerError {
    ServerError::NotFound(format!("{what} {id}"))
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/catch", get(list_catches).post(create_catch))
        .route("/api/catch/available", get(available_catches))
        .route("/api/catch/search", get(search_catches))
        .route("/api/catch/refresh", put(refresh_catches))
        .route("/api/catch/species/{name}", get(catches_by_species))
        .route("/api/catch/{id}", get(get_catch).put(update_catch).delete(delete_catch))
        .route("/api/fisher", get(list_fishers))
        .route("/api/fisher/fisher", post(create_fisher))
        .route("/api/fisher/fisher/{id}", get(get_fisher).put(update_fisher).delete(delete_fisher))
        .route("/api/fisher/fisher/{id}/catches", get(fisher_catches))
        .route("/api/fisher/fisher/{id}/catches/expired", get(fisher_expired_catches))
        .route("/api/fisher/fisher/{id}/catches/sold", get(fisher_sold_catches))
        .route("/api/species", get(list_species).post(create_species))
        .route("/api/species/{id}", get(get_species).put(update_species).delete(delete_species))
        .route("/api/landing", get(list_landings).post(create_landing))
        .route("/api/landing/{id}", get(get_landing).put(update_landing).delete(delete_landing))
        .route("/api/order", get(list_orders).post(create_order))
        .route("/api/order/", post(create_order))
        .route("/api/order/customer/{username}", get(orders_by_customer))
        .route("/api/order/{id}", get(get_order).put(update_order).delete(delete_order))
        .route("/api/order-item", get(list_order_items).post(create_order_item))
        .route(
            "/api/order-item/{id}",
            get(get_order_item).put(update_order_item).delete(delete_order_item),
        )
        .route("/api/person", get(list_persons).post(create_person))
        .route("/api/person/roles", get(persons_by_role))
        .route("/api/person/login", post(login))
        .route("/api/person/username/{username}", get(person_by_username))
        .route("/api/person/{id}", get(get_person).put(update_person).delete(delete_person))
        .route("/api/person/{id}/role", get(role_of_person))
        .route("/api/role", get(list_roles).post(create_role))
        .route("/api/role/", post(create_role))
        .route("/api/role/type/{role_type}", get(role_by_type))
        .route("/api/role/{id}", get(get_role).put(update_role).delete(delete_role))
        .route("/html-error", get(html_error))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Catches
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchInput {
    pub species_id: Option<Id>,
    pub fisher_id: Option<Id>,
    pub landing_id: Option<Id>,
    pub quantity_in_kg: Option<f64>,
    pub price: Option<f64>,
    pub available: Option<bool>,
    pub time_stamp: Option<String>,
    pub pickup_time: Option<String>,
    #[serde(rename = "pickup_instructions")]
    pub pickup_instructions: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub species_name: Option<String>,
    pub landing_name: Option<String>,
}

async fn list_catches(State(db): State<Db>) -> Json<Vec<CatchView>> {
    Json(db.read().await.catches_where(|_| true))
}

async fn available_catches(State(db): State<Db>) -> Json<Vec<CatchView>> {
    Json(db.read().await.catches_where(|c| c.available))
}

async fn search_catches(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<CatchView>> {
    let store = db.read().await;
    // An unknown name matches nothing rather than everything.
    let species = params.species_name.map(|n| store.species_named(&n));
    let landing = params.landing_name.map(|n| store.landing_named(&n));
    Json(store.catches_where(|c| {
        c.available
            && species.map_or(true, |s| s == Some(c.species_id))
            && landing.map_or(true, |l| l == Some(c.landing_id))
    }))
}

async fn catches_by_species(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Json<Vec<CatchView>> {
    let store = db.read().await;
    let species = store.species_named(&name);
    Json(store.catches_where(|c| Some(c.species_id) == species))
}

async fn refresh_catches(State(db): State<Db>) -> StatusCode {
    db.write().await.refresh_availability();
    StatusCode::NO_CONTENT
}

async fn get_catch(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<CatchView>> {
    let store = db.read().await;
    let c = store.catches.get(&id).ok_or_else(|| missing("Catch", id))?;
    Ok(Json(store.catch_view(c)))
}

async fn create_catch(
    State(db): State<Db>,
    Json(input): Json<CatchInput>,
) -> ApiResult<(StatusCode, Json<CatchView>)> {
    let mut store = db.write().await;
    let (Some(species_id), Some(fisher_id), Some(landing_id)) =
        (input.species_id, input.fisher_id, input.landing_id)
    else {
        return Err(ServerError::BadRequest(
            "speciesId, fisherId and landingId are required".to_string(),
        ));
    };
    if !store.species.contains_key(&species_id) {
        return Err(missing("Species", species_id));
    }
    if !store.fishers.contains_key(&fisher_id) {
        return Err(missing("Fisher", fisher_id));
    }
    if !store.landings.contains_key(&landing_id) {
        return Err(missing("Landing", landing_id));
    }
    let id = store.next_id();
    let c = Catch {
        id,
        species_id,
        fisher_id,
        landing_id,
        quantity_in_kg: input.quantity_in_kg.unwrap_or_default(),
        price: input.price.unwrap_or_default(),
        available: input.available.unwrap_or(true),
        sold: false,
        expired: false,
        time_stamp: input.time_stamp,
        pickup_time: input.pickup_time,
        pickup_instructions: input.pickup_instructions,
    };
    let view = store.catch_view(&c);
    store.catches.insert(id, c);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_catch(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<CatchInput>,
) -> ApiResult<Json<CatchView>> {
    let mut store = db.write().await;
    let c = store.catches.get_mut(&id).ok_or_else(|| missing("Catch", id))?;
    if let Some(v) = input.species_id {
        c.species_id = v;
    }
    if let Some(v) = input.fisher_id {
        c.fisher_id = v;
    }
    if let Some(v) = input.landing_id {
        c.landing_id = v;
    }
    if let Some(v) = input.quantity_in_kg {
        c.quantity_in_kg = v;
    }
    if let Some(v) = input.price {
        c.price = v;
    }
    if let Some(v) = input.available {
        c.available = v;
    }
    if input.pickup_time.is_some() {
        c.pickup_time = input.pickup_time;
    }
    if input.pickup_instructions.is_some() {
        c.pickup_instructions = input.pickup_instructions;
    }
    let c = c.clone();
    Ok(Json(store.catch_view(&c)))
}

async fn delete_catch(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .catches
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Catch", id))
}

// ---------------------------------------------------------------------------
// Fishers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FisherInput {
    pub person: Option<IdInput>,
    pub fishing_license_number: Option<String>,
}

#[derive(Deserialize)]
pub struct IdInput {
    pub id: Id,
}

async fn list_fishers(State(db): State<Db>) -> Json<Vec<FisherView>> {
    let store = db.read().await;
    Json(store.fishers.values().map(|f| store.fisher_view(f)).collect())
}

async fn get_fisher(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<FisherView>> {
    let store = db.read().await;
    let f = store.fishers.get(&id).ok_or_else(|| missing("Fisher", id))?;
    Ok(Json(store.fisher_view(f)))
}

async fn fisher_catches(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<Vec<CatchView>>> {
    fisher_catches_where(&db, id, |_| true).await
}

async fn fisher_expired_catches(
    State(db): State<Db>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Vec<CatchView>>> {
    fisher_catches_where(&db, id, |c| c.expired && !c.sold).await
}

async fn fisher_sold_catches(
    State(db): State<Db>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Vec<CatchView>>> {
    fisher_catches_where(&db, id, |c| c.sold).await
}

async fn fisher_catches_where(
    db: &Db,
    id: Id,
    keep: impl Fn(&Catch) -> bool,
) -> ApiResult<Json<Vec<CatchView>>> {
    let store = db.read().await;
    if !store.fishers.contains_key(&id) {
        return Err(missing("Fisher", id));
    }
    Ok(Json(store.catches_where(|c| c.fisher_id == id && keep(c))))
}

async fn create_fisher(
    State(db): State<Db>,
    Json(input): Json<FisherInput>,
) -> ApiResult<(StatusCode, Json<FisherView>)> {
    let mut store = db.write().await;
    let person_id = input.person.map(|p| p.id);
    if let Some(pid) = person_id {
        if !store.persons.contains_key(&pid) {
            return Err(missing("Person", pid));
        }
    }
    let id = store.next_id();
    let f = Fisher {
        id,
        person_id,
        fishing_license_number: input.fishing_license_number.unwrap_or_default(),
    };
    let view = store.fisher_view(&f);
    store.fishers.insert(id, f);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_fisher(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<FisherInput>,
) -> ApiResult<Json<FisherView>> {
    let mut store = db.write().await;
    let f = store.fishers.get_mut(&id).ok_or_else(|| missing("Fisher", id))?;
    if let Some(license) = input.fishing_license_number {
        f.fishing_license_number = license;
    }
    if let Some(person) = input.person {
        f.person_id = Some(person.id);
    }
    let f = f.clone();
    Ok(Json(store.fisher_view(&f)))
}

async fn delete_fisher(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .fishers
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Fisher", id))
}

// ---------------------------------------------------------------------------
// Species and landings
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub info_link: Option<String>,
}

#[derive(Deserialize)]
pub struct LandingInput {
    pub name: Option<String>,
    pub address: Option<String>,
}

async fn list_species(State(db): State<Db>) -> Json<Vec<Species>> {
    Json(db.read().await.species.values().cloned().collect())
}

async fn get_species(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<Species>> {
    let store = db.read().await;
    store
        .species
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| missing("Species", id))
}

async fn create_species(
    State(db): State<Db>,
    Json(input): Json<SpeciesInput>,
) -> ApiResult<(StatusCode, Json<Species>)> {
    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("name is required".to_string()))?;
    let mut store = db.write().await;
    let id = store.next_id();
    let species = Species {
        id,
        name,
        description: input.description,
        image_url: input.image_url,
        info_link: input.info_link,
    };
    store.species.insert(id, species.clone());
    Ok((StatusCode::CREATED, Json(species)))
}

async fn update_species(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<SpeciesInput>,
) -> ApiResult<Json<Species>> {
    let mut store = db.write().await;
    let s = store.species.get_mut(&id).ok_or_else(|| missing("Species", id))?;
    if let Some(name) = input.name {
        s.name = name;
    }
    if input.description.is_some() {
        s.description = input.description;
    }
    if input.image_url.is_some() {
        s.image_url = input.image_url;
    }
    if input.info_link.is_some() {
        s.info_link = input.info_link;
    }
    Ok(Json(s.clone()))
}

async fn delete_species(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .species
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Species", id))
}

async fn list_landings(State(db): State<Db>) -> Json<Vec<Landing>> {
    Json(db.read().await.landings.values().cloned().collect())
}

async fn get_landing(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<Landing>> {
    let store = db.read().await;
    store
        .landings
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| missing("Landing", id))
}

async fn create_landing(
    State(db): State<Db>,
    Json(input): Json<LandingInput>,
) -> ApiResult<(StatusCode, Json<Landing>)> {
    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("name is required".to_string()))?;
    let mut store = db.write().await;
    let id = store.next_id();
    let landing = Landing {
        id,
        name,
        address: input.address,
    };
    store.landings.insert(id, landing.clone());
    Ok((StatusCode::CREATED, Json(landing)))
}

async fn update_landing(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<LandingInput>,
) -> ApiResult<Json<Landing>> {
    let mut store = db.write().await;
    let l = store.landings.get_mut(&id).ok_or_else(|| missing("Landing", id))?;
    if let Some(name) = input.name {
        l.name = name;
    }
    if input.address.is_some() {
        l.address = input.address;
    }
    Ok(Json(l.clone()))
}

async fn delete_landing(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .landings
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Landing", id))
}

// ---------------------------------------------------------------------------
// Orders and order items
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer: Option<IdInput>,
    pub order_status: Option<String>,
    pub order_date_time: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItemInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub order: Option<IdInput>,
    pub fish_catch: Option<IdInput>,
    pub quantity: Option<f64>,
}

async fn list_orders(State(db): State<Db>) -> Json<Vec<OrderView>> {
    let store = db.read().await;
    Json(store.orders.values().map(|o| store.order_view(o)).collect())
}

async fn get_order(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<OrderView>> {
    let store = db.read().await;
    let o = store.orders.get(&id).ok_or_else(|| missing("Order", id))?;
    Ok(Json(store.order_view(o)))
}

async fn orders_by_customer(
    State(db): State<Db>,
    Path(username): Path<String>,
) -> Json<Vec<OrderView>> {
    let store = db.read().await;
    let customer = store
        .persons
        .values()
        .find(|p| p.username == username)
        .map(|p| p.id);
    Json(
        store
            .orders
            .values()
            .filter(|o| customer.is_some() && o.customer_id == customer)
            .map(|o| store.order_view(o))
            .collect(),
    )
}

async fn create_order(
    State(db): State<Db>,
    Json(input): Json<OrderInput>,
) -> ApiResult<(StatusCode, Json<OrderView>)> {
    let mut store = db.write().await;
    let customer_id = input.customer.map(|c| c.id);
    if let Some(cid) = customer_id {
        if !store.persons.contains_key(&cid) {
            return Err(missing("Person", cid));
        }
    }
    for item in &input.order_items {
        if let Some(catch_ref) = &item.fish_catch {
            if !store.catches.contains_key(&catch_ref.id) {
                return Err(missing("Catch", catch_ref.id));
            }
        }
    }
    let id = store.next_id();
    store.orders.insert(
        id,
        Order {
            id,
            customer_id,
            order_status: input.order_status.unwrap_or_else(|| "PENDING".to_string()),
            order_date_time: input.order_date_time,
        },
    );
    for item in input.order_items {
        let item_id = store.next_id();
        let catch_id = item.fish_catch.map(|c| c.id);
        store.order_items.insert(
            item_id,
            OrderItem {
                id: item_id,
                order_id: Some(id),
                catch_id,
                quantity: item.quantity.unwrap_or(1.0),
            },
        );
        if let Some(c) = catch_id.and_then(|cid| store.catches.get_mut(&cid)) {
            c.sold = true;
            c.available = false;
        }
    }
    let view = store.order_view(&store.orders[&id]);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_order(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<OrderInput>,
) -> ApiResult<Json<OrderView>> {
    let mut store = db.write().await;
    let o = store.orders.get_mut(&id).ok_or_else(|| missing("Order", id))?;
    if let Some(status) = input.order_status {
        o.order_status = status;
    }
    if input.order_date_time.is_some() {
        o.order_date_time = input.order_date_time;
    }
    if let Some(customer) = input.customer {
        o.customer_id = Some(customer.id);
    }
    let o = o.clone();
    Ok(Json(store.order_view(&o)))
}

async fn delete_order(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.orders.remove(&id).ok_or_else(|| missing("Order", id))?;
    store.order_items.retain(|_, item| item.order_id != Some(id));
    Ok(StatusCode::NO_CONTENT)
}

async fn list_order_items(State(db): State<Db>) -> Json<Vec<OrderItemView>> {
    let store = db.read().await;
    Json(store.order_items.values().map(|i| store.order_item_view(i)).collect())
}

async fn get_order_item(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<OrderItemView>> {
    let store = db.read().await;
    let item = store.order_items.get(&id).ok_or_else(|| missing("Order item", id))?;
    Ok(Json(store.order_item_view(item)))
}

async fn create_order_item(
    State(db): State<Db>,
    Json(input): Json<OrderItemInput>,
) -> ApiResult<(StatusCode, Json<OrderItemView>)> {
    let mut store = db.write().await;
    let order_id = input.order.map(|o| o.id);
    if let Some(oid) = order_id {
        if !store.orders.contains_key(&oid) {
            return Err(missing("Order", oid));
        }
    }
    let id = store.next_id();
    let item = OrderItem {
        id,
        order_id,
        catch_id: input.fish_catch.map(|c| c.id),
        quantity: input.quantity.unwrap_or(1.0),
    };
    let view = store.order_item_view(&item);
    store.order_items.insert(id, item);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_order_item(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<OrderItemInput>,
) -> ApiResult<Json<OrderItemView>> {
    let mut store = db.write().await;
    let item = store
        .order_items
        .get_mut(&id)
        .ok_or_else(|| missing("Order item", id))?;
    if let Some(q) = input.quantity {
        item.quantity = q;
    }
    if let Some(c) = input.fish_catch {
        item.catch_id = Some(c.id);
    }
    let item = item.clone();
    Ok(Json(store.order_item_view(&item)))
}

async fn delete_order_item(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .order_items
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Order item", id))
}

// ---------------------------------------------------------------------------
// Persons and roles
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<IdInput>,
}

#[derive(Deserialize)]
pub struct RoleQuery {
    pub role: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
    #[serde(rename = "type")]
    pub role_type: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

async fn list_persons(State(db): State<Db>) -> Json<Vec<PersonView>> {
    let store = db.read().await;
    Json(store.persons.values().map(|p| store.person_view(p)).collect())
}

async fn persons_by_role(
    State(db): State<Db>,
    Query(query): Query<RoleQuery>,
) -> Json<Vec<PersonView>> {
    let store = db.read().await;
    Json(
        store
            .persons
            .values()
            .filter(|p| {
                store
                    .roles
                    .get(&p.role_id)
                    .is_some_and(|r| r.role_type == query.role)
            })
            .map(|p| store.person_view(p))
            .collect(),
    )
}

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> ApiResult<Json<PersonView>> {
    let store = db.read().await;
    let person = store
        .persons
        .values()
        .find(|p| p.email == input.email && p.password == input.password)
        .ok_or(ServerError::Unauthorized)?;
    Ok(Json(store.person_view(person)))
}

async fn person_by_username(
    State(db): State<Db>,
    Path(username): Path<String>,
) -> ApiResult<Json<PersonView>> {
    let store = db.read().await;
    let person = store
        .persons
        .values()
        .find(|p| p.username == username)
        .ok_or_else(|| missing("Person", &username))?;
    Ok(Json(store.person_view(person)))
}

async fn get_person(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<PersonView>> {
    let store = db.read().await;
    let p = store.persons.get(&id).ok_or_else(|| missing("Person", id))?;
    Ok(Json(store.person_view(p)))
}

async fn role_of_person(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<String>> {
    let store = db.read().await;
    let p = store.persons.get(&id).ok_or_else(|| missing("Person", id))?;
    let role = store.roles.get(&p.role_id).ok_or_else(|| missing("Role", p.role_id))?;
    Ok(Json(role.role_type.clone()))
}

async fn create_person(
    State(db): State<Db>,
    Json(input): Json<PersonInput>,
) -> ApiResult<(StatusCode, Json<PersonView>)> {
    let (Some(username), Some(email)) = (input.username, input.email) else {
        return Err(ServerError::BadRequest("username and email are required".to_string()));
    };
    let mut store = db.write().await;
    let role_id = input.role.map(|r| r.id).unwrap_or(3);
    if !store.roles.contains_key(&role_id) {
        return Err(missing("Role", role_id));
    }
    let id = store.next_id();
    let person = Person {
        id,
        username,
        email,
        password: input.password.unwrap_or_default(),
        role_id,
    };
    let view = store.person_view(&person);
    store.persons.insert(id, person);
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_person(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<PersonInput>,
) -> ApiResult<Json<PersonView>> {
    let mut store = db.write().await;
    let p = store.persons.get_mut(&id).ok_or_else(|| missing("Person", id))?;
    if let Some(username) = input.username {
        p.username = username;
    }
    if let Some(email) = input.email {
        p.email = email;
    }
    if let Some(password) = input.password {
        p.password = password;
    }
    if let Some(role) = input.role {
        p.role_id = role.id;
    }
    let p = p.clone();
    Ok(Json(store.person_view(&p)))
}

async fn delete_person(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .persons
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Person", id))
}

async fn list_roles(State(db): State<Db>) -> Json<Vec<Role>> {
    Json(db.read().await.roles.values().cloned().collect())
}

async fn get_role(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<Json<Role>> {
    let store = db.read().await;
    store
        .roles
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| missing("Role", id))
}

async fn role_by_type(
    State(db): State<Db>,
    Path(role_type): Path<String>,
) -> ApiResult<Json<Role>> {
    let store = db.read().await;
    store
        .roles
        .values()
        .find(|r| r.role_type == role_type)
        .cloned()
        .map(Json)
        .ok_or_else(|| missing("Role", &role_type))
}

async fn create_role(
    State(db): State<Db>,
    Json(input): Json<RoleInput>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    let role_type = input
        .role_type
        .ok_or_else(|| ServerError::BadRequest("type is required".to_string()))?;
    let mut store = db.write().await;
    let id = store.next_id();
    let role = Role {
        id,
        role_type,
        label: input.label,
        description: input.description,
    };
    store.roles.insert(id, role.clone());
    Ok((StatusCode::CREATED, Json(role)))
}

async fn update_role(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<RoleInput>,
) -> ApiResult<Json<Role>> {
    let mut store = db.write().await;
    let r = store.roles.get_mut(&id).ok_or_else(|| missing("Role", id))?;
    if let Some(t) = input.role_type {
        r.role_type = t;
    }
    if input.label.is_some() {
        r.label = input.label;
    }
    if input.description.is_some() {
        r.description = input.description;
    }
    Ok(Json(r.clone()))
}

async fn delete_role(State(db): State<Db>, Path(id): Path<Id>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .roles
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| missing("Role", id))
}

// ---------------------------------------------------------------------------
// Misrouted requests
// ---------------------------------------------------------------------------

const ERROR_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>502 Bad Gateway</title></head>\n\
<body><center><h1>502 Bad Gateway</h1></center><hr><center>nginx</center></body>\n</html>\n";

async fn html_error() -> impl IntoResponse {
    (
        StatusCode::BAD_GATEWAY,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        ERROR_PAGE,
    )
}
