//! Global CLI options and store construction.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use storefront_catalog::config::{BASE_URL_ENV, TIMEOUT_ENV};
use storefront_catalog::{CatalogConfig, CatalogStore, DynSource, HttpProductSource, MemorySource};

/// Options shared by every command.
///
/// Connection settings can also be set via env vars; a flag wins over its variable.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Base URL of the product API (env: STOREFRONT_API_BASE_URL)
    #[arg(long, global = true, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    /// Remote fetch timeout in milliseconds (env: STOREFRONT_HTTP_TIMEOUT_MS)
    #[arg(long, global = true, env = TIMEOUT_ENV)]
    pub timeout_ms: Option<u64>,

    /// Never contact the product API; only locally created products are visible
    #[arg(long, global = true)]
    pub offline: bool,

    /// JSON output envelope
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output (implies --json)
    #[arg(long, global = true)]
    pub pretty: bool,
}

impl GlobalOpts {
    pub fn json_output(&self) -> bool {
        self.json || self.pretty
    }

    pub fn catalog_config(&self) -> Result<CatalogConfig> {
        let mut config = CatalogConfig::default();
        if let Some(raw) = &self.base_url {
            config.source = config.source.with_base_url(raw).context("parse --base-url")?;
        }
        if let Some(ms) = self.timeout_ms {
            config.source = config.source.with_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }

    pub fn open_store(&self) -> Result<CatalogStore<DynSource>> {
        let source: DynSource = if self.offline {
            Arc::new(MemorySource::new())
        } else {
            let config = self.catalog_config()?;
            tracing::debug!(url = %config.source.products_url(), "using http product source");
            Arc::new(HttpProductSource::new(config.source).context("build product source")?)
        };
        Ok(CatalogStore::new(source))
    }
}
