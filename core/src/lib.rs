//! Blocking API client core for the FishCatch marketplace backend.
//!
//! # Overview
//! Every resource (catches, fishers, species, landings, orders, order items,
//! persons, roles) is reached through one request adapter, `ApiClient`, which
//! joins URLs, applies default headers, optionally rewrites absolute URLs for
//! a local dev proxy, executes the call through a `Transport` and classifies
//! the result into an `Outcome` or a typed `ApiError`.
//!
//! # Design
//! - `ApiConfig` is built once and shared; the adapter never reads the
//!   environment itself.
//! - `ApiClient::build` / `ApiClient::classify` are pure, so the URL, header
//!   and error rules are testable without a network.
//! - The URL rewrite is an explicit `UrlResolver` strategy.
//! - Resource services return typed DTOs and propagate errors unchanged.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resolve;
pub mod services;
pub mod transport;
pub mod types;

pub use catalog::{CatchFilters, CatchForm, CatchSearch, FilterOptions, LatestOnly};
pub use client::{join_url, ApiClient, Outcome, RequestOptions};
pub use config::{ApiConfig, Endpoint, Resource};
pub use error::{ApiError, FieldErrors};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resolve::{DevProxy, Direct, UrlMode, UrlResolver};
pub use transport::{Transport, TransportError, TransportErrorKind};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    Catch, Credentials, Fisher, Id, Landing, NewCatch, Order, OrderItem, Person, RoleType,
    Species, UserRole,
};
