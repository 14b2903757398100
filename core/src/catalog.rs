//! Browsing and recording helpers built on the resource services.
//!
//! # Design
//! `FilterOptions::fetch` issues its three list calls concurrently on scoped
//! threads. `CatchSearch` hands every search a ticket from `LatestOnly` and
//! discards results whose ticket has been superseded, so a slow response for
//! an old filter can never overwrite the result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use tracing::debug;

use crate::client::ApiClient;
use crate::error::{ApiError, FieldErrors};
use crate::transport::Transport;
use crate::types::{Catch, Fisher, Id, Landing, NewCatch, Species};

/// Choices offered by the catch filters and the new-catch form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub species: Vec<Species>,
    pub landings: Vec<Landing>,
    pub fishers: Vec<Fisher>,
}

impl FilterOptions {
    /// Fetch species, landings and fishers in parallel.
    ///
    /// All three calls run to completion; the first error in that order wins.
    pub fn fetch<T: Transport>(client: &ApiClient<T>) -> Result<Self, ApiError> {
        thread::scope(|s| {
            let species = s.spawn(|| client.species().all());
            let landings = s.spawn(|| client.landings().all());
            let fishers = s.spawn(|| client.fishers().all());

            let species = join(species);
            let landings = join(landings);
            let fishers = join(fishers);

            Ok(Self {
                species: species?,
                landings: landings?,
                fishers: fishers?,
            })
        })
    }
}

fn join<R>(handle: thread::ScopedJoinHandle<'_, R>) -> R {
    match handle.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Active catch filters, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchFilters {
    pub species: Option<String>,
    pub landing: Option<String>,
}

impl CatchFilters {
    /// Apply a `{filter_type}/{value}` pair such as one taken from a route.
    ///
    /// Unknown filter types are ignored; an empty value clears the filter.
    pub fn set(&mut self, filter_type: &str, value: &str) {
        let value = Some(value.to_string()).filter(|v| !v.is_empty());
        match filter_type {
            "species" => self.species = value,
            "landing" => self.landing = value,
            other => debug!(filter_type = other, "ignoring unknown catch filter"),
        }
    }
}

/// Proof that a request was issued at a given point in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Issues increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
pub struct LatestOnly {
    latest: AtomicU64,
}

impl LatestOnly {
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Last-request-wins search over available catches.
#[derive(Debug, Default)]
pub struct CatchSearch {
    sequence: LatestOnly,
}

impl CatchSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search; `Ok(None)` means a newer search started meanwhile and
    /// this result (or error) was dropped.
    pub fn search<T: Transport>(
        &self,
        client: &ApiClient<T>,
        filters: &CatchFilters,
    ) -> Result<Option<Vec<Catch>>, ApiError> {
        let ticket = self.sequence.issue();
        let result = client
            .catches()
            .search(filters.species.as_deref(), filters.landing.as_deref());

        if !self.sequence.is_current(ticket) {
            debug!(?ticket, "discarding superseded catch search");
            return Ok(None);
        }
        result.map(Some)
    }
}

/// New-catch form input exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchForm {
    pub species_id: String,
    pub fisher_id: String,
    pub landing_id: String,
    pub quantity_in_kg: String,
    pub price_per_kg: String,
}

impl CatchForm {
    /// Check required fields and positive amounts, then map the selections
    /// to ids that still exist in `options`.
    pub fn validate(&self, options: &FilterOptions) -> Result<NewCatch, FieldErrors> {
        let mut errors = FieldErrors::default();

        let species_id = required_id(&mut errors, "speciesId", &self.species_id, "Species is required");
        let fisher_id = required_id(&mut errors, "fisherId", &self.fisher_id, "Fisher is required");
        let landing_id = required_id(&mut errors, "landingId", &self.landing_id, "Landing port is required");
        let quantity = positive(
            &mut errors,
            "quantityInKg",
            &self.quantity_in_kg,
            "Quantity is required",
            "Quantity must be greater than 0",
        );
        let price = positive(
            &mut errors,
            "pricePerKg",
            &self.price_per_kg,
            "Price per kg is required",
            "Price must be greater than 0",
        );

        if let Some(id) = species_id {
            if !options.species.iter().any(|s| s.id == id) {
                errors.insert("speciesId", stale("species"));
            }
        }
        if let Some(id) = fisher_id {
            if !options.fishers.iter().any(|f| f.id == id) {
                errors.insert("fisherId", stale("fisher"));
            }
        }
        if let Some(id) = landing_id {
            if !options.landings.iter().any(|l| l.id == id) {
                errors.insert("landingId", stale("landing"));
            }
        }

        match (species_id, fisher_id, landing_id, quantity, price) {
            (Some(species_id), Some(fisher_id), Some(landing_id), Some(quantity_in_kg), Some(price))
                if errors.is_empty() =>
            {
                Ok(NewCatch {
                    species_id,
                    fisher_id,
                    landing_id,
                    quantity_in_kg,
                    price,
                    ..NewCatch::default()
                })
            }
            _ => Err(errors),
        }
    }
}

fn stale(what: &str) -> String {
    format!("Selected {what} is no longer available. Please refresh and try again.")
}

fn required_id(errors: &mut FieldErrors, field: &'static str, value: &str, missing: &str) -> Option<Id> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, missing);
        return None;
    }
    match value.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.insert(field, format!("{value} is not a valid selection"));
            None
        }
    }
}

fn positive(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    missing: &str,
    not_positive: &str,
) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, missing);
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Some(n),
        _ => {
            errors.insert(field, not_positive);
            None
        }
    }
}
