//! Process-wide API configuration.
//!
//! Built once at startup (from the environment, a dotenv file, or explicitly)
//! and shared by reference. Nothing in the adapter reads the environment on its
//! own, so tests inject whatever configuration they need.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::resolve::UrlMode;

pub const API_DEBUG_KEY: &str = "API_DEBUG";
pub const FORCE_PROXY_KEY: &str = "FORCE_PROXY";

/// A backend entity family with its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    Catch,
    Fisher,
    Species,
    Landing,
    Order,
    OrderItem,
    Person,
    UserRole,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Catch,
        Resource::Fisher,
        Resource::Species,
        Resource::Landing,
        Resource::Order,
        Resource::OrderItem,
        Resource::Person,
        Resource::UserRole,
    ];

    /// Environment key holding this resource's base URL.
    pub fn env_key(self) -> &'static str {
        match self {
            Resource::Catch => "CATCH_ENDPOINT",
            Resource::Fisher => "FISHER_ENDPOINT",
            Resource::Species => "SPECIES_ENDPOINT",
            Resource::Landing => "LANDING_ENDPOINT",
            Resource::Order => "ORDER_ENDPOINT",
            Resource::OrderItem => "ORDER_ITEM_ENDPOINT",
            Resource::Person => "PERSON_ENDPOINT",
            Resource::UserRole => "USER_ROLE_ENDPOINT",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resource::Catch => "catch",
            Resource::Fisher => "fisher",
            Resource::Species => "species",
            Resource::Landing => "landing",
            Resource::Order => "order",
            Resource::OrderItem => "order-item",
            Resource::Person => "person",
            Resource::UserRole => "role",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Resource::ALL.iter().map(|r| r.name()).collect();
                ApiError::Validation(format!(
                    "unknown resource: {s}. Valid resources are: {}",
                    names.join(", ")
                ))
            })
    }
}

/// A resource's base URL together with the key it is configured under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub key: &'static str,
    pub base_url: Option<String>,
}

impl Endpoint {
    pub fn new(key: &'static str, base_url: impl Into<String>) -> Self {
        Self {
            key,
            base_url: Some(base_url.into()),
        }
    }

    /// An endpoint whose key was never configured.
    pub fn unset(key: &'static str) -> Self {
        Self { key, base_url: None }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    endpoints: BTreeMap<Resource, String>,
    pub debug: bool,
    pub url_mode: UrlMode,
}

impl ApiConfig {
    /// Read every key from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load `path` as a dotenv file, then read the environment.
    ///
    /// Variables already present in the environment take precedence over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        dotenvy::from_path(path).map_err(|e| {
            ApiError::Validation(format!("failed to load {}: {e}", path.display()))
        })?;
        Ok(Self::from_env())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut endpoints = BTreeMap::new();
        for resource in Resource::ALL {
            match read(resource.env_key()) {
                Some(url) => {
                    endpoints.insert(resource, url);
                }
                None => info!(key = resource.env_key(), "endpoint not configured"),
            }
        }

        let debug = read(API_DEBUG_KEY)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let url_mode = match read(FORCE_PROXY_KEY) {
            Some(v) if v.eq_ignore_ascii_case("false") => UrlMode::Direct,
            Some(v) => {
                if !v.eq_ignore_ascii_case("true") {
                    warn!(key = FORCE_PROXY_KEY, value = %v, "unrecognised value, enabling dev proxy");
                }
                UrlMode::DevProxy
            }
            None => UrlMode::Direct,
        };

        Self {
            endpoints,
            debug,
            url_mode,
        }
    }

    pub fn with_endpoint(mut self, resource: Resource, base_url: impl Into<String>) -> Self {
        self.endpoints.insert(resource, base_url.into());
        self
    }

    /// Point every resource at `{root}/api/{resource}`.
    pub fn with_api_root(mut self, root: &str) -> Self {
        let root = root.trim_end_matches('/');
        for resource in Resource::ALL {
            self.endpoints
                .insert(resource, format!("{root}/api/{}", resource.name()));
        }
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_url_mode(mut self, url_mode: UrlMode) -> Self {
        self.url_mode = url_mode;
        self
    }

    pub fn endpoint(&self, resource: Resource) -> Endpoint {
        Endpoint {
            key: resource.env_key(),
            base_url: self.endpoints.get(&resource).cloned(),
        }
    }

    /// Keys of resources without a configured base URL.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        Resource::ALL
            .into_iter()
            .filter(|r| !self.endpoints.contains_key(r))
            .map(Resource::env_key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_endpoints_and_reports_missing() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("CATCH_ENDPOINT", "http://52.3.6.17:8080/api/catch"),
            ("SPECIES_ENDPOINT", "  "),
        ]));
        assert_eq!(
            config.endpoint(Resource::Catch).base_url.as_deref(),
            Some("http://52.3.6.17:8080/api/catch")
        );
        assert_eq!(config.endpoint(Resource::Species).base_url, None);
        let missing = config.missing_keys();
        assert_eq!(missing.len(), 7);
        assert!(missing.contains(&"SPECIES_ENDPOINT"));
        assert!(!missing.contains(&"CATCH_ENDPOINT"));
    }

    #[test]
    fn debug_flag_only_for_true() {
        assert!(ApiConfig::from_lookup(lookup(&[("API_DEBUG", "TRUE")])).debug);
        assert!(!ApiConfig::from_lookup(lookup(&[("API_DEBUG", "1")])).debug);
        assert!(!ApiConfig::from_lookup(lookup(&[])).debug);
    }

    #[test]
    fn proxy_mode_from_flag() {
        assert_eq!(ApiConfig::from_lookup(lookup(&[])).url_mode, UrlMode::Direct);
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[("FORCE_PROXY", "false")])).url_mode,
            UrlMode::Direct
        );
        assert_eq!(
            ApiConfig::from_lookup(lookup(&[("FORCE_PROXY", "true")])).url_mode,
            UrlMode::DevProxy
        );
    }

    #[test]
    fn api_root_fills_every_resource() {
        let config = ApiConfig::default().with_api_root("http://localhost:8080/");
        assert!(config.missing_keys().is_empty());
        assert_eq!(
            config.endpoint(Resource::OrderItem).base_url.as_deref(),
            Some("http://localhost:8080/api/order-item")
        );
    }

    #[test]
    fn resource_parses_from_name() {
        assert_eq!("order_item".parse::<Resource>().unwrap(), Resource::OrderItem);
        assert_eq!("Catch".parse::<Resource>().unwrap(), Resource::Catch);
        assert!("boat".parse::<Resource>().is_err());
    }
}
