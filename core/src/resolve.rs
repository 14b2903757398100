//! Base URL resolution strategies.
//!
//! `Direct` sends requests to the configured host. `DevProxy` strips the
//! scheme and authority so requests go to a local reverse proxy that forwards
//! `/api/...` to the real backend.

use std::sync::Arc;

use url::Url;

/// Maps a configured base URL to the base actually requested.
pub trait UrlResolver: Send + Sync {
    fn resolve_base(&self, base_url: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl UrlResolver for Direct {
    fn resolve_base(&self, base_url: &str) -> String {
        base_url.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DevProxy;

impl UrlResolver for DevProxy {
    fn resolve_base(&self, base_url: &str) -> String {
        // Relative bases are already proxy paths.
        match Url::parse(base_url) {
            Ok(url) if url.has_host() => {
                let path = url.path();
                if path.is_empty() {
                    "/".to_string()
                } else {
                    path.to_string()
                }
            }
            _ => base_url.to_string(),
        }
    }
}

/// Resolver choice as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlMode {
    #[default]
    Direct,
    DevProxy,
}

impl UrlMode {
    pub fn resolver(self) -> Arc<dyn UrlResolver> {
        match self {
            UrlMode::Direct => Arc::new(Direct),
            UrlMode::DevProxy => Arc::new(DevProxy),
        }
    }
}
