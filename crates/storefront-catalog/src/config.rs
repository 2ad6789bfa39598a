use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
pub const BASE_URL_ENV: &str = "STOREFRONT_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "STOREFRONT_HTTP_TIMEOUT_MS";

#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Remote product source configuration.
    pub source: SourceConfig,
}

impl CatalogConfig {
    /// Build config from process environment, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup; malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut source = SourceConfig::default();
        if let Some(raw) = lookup(BASE_URL_ENV) {
            source.base_url = parse_base_url(&raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            source.timeout = parse_timeout_ms(TIMEOUT_ENV, &raw)?;
        }
        Ok(Self { source })
    }
}

/// Configuration for the HTTP product source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: Url,
    /// Hard cap on a single base-collection fetch.
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(10),
        }
    }
}

impl SourceConfig {
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the product collection endpoint.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url.as_str().trim_end_matches('/'))
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::BaseUrl {
        value: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Scheme(other.to_string())),
    }
}

fn parse_timeout_ms(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::Timeout {
            name,
            value: raw.to_string(),
        })
}
