use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use tokio::time::timeout;
use tracing::debug;

use super::traits::{ProductSource, RemoteProduct};
use crate::config::SourceConfig;
use crate::error::{ConfigError, RemoteError};

/// Product source backed by a fakestore-style `GET /products` endpoint.
pub struct HttpProductSource {
    client: Client,
    config: SourceConfig,
    products_url: String,
}

impl std::fmt::Debug for HttpProductSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductSource")
            .field("products_url", &self.products_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl HttpProductSource {
    pub fn new(config: SourceConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        let products_url = config.products_url();
        Ok(Self {
            client,
            config,
            products_url,
        })
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteProduct>, RemoteError> {
        let request = self
            .client
            .get(&self.products_url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        // Client timeout covers the transfer; this caps connect + body as a whole.
        let response = match timeout(self.config.timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => return Err(RemoteError::Timeout(self.config.timeout)),
            Ok(Err(e)) => return Err(RemoteError::Transport(e.to_string())),
            Err(_) => return Err(RemoteError::Timeout(self.config.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        let body = match timeout(self.config.timeout, response.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) if e.is_timeout() => return Err(RemoteError::Timeout(self.config.timeout)),
            Ok(Err(e)) => return Err(RemoteError::Transport(e.to_string())),
            Err(_) => return Err(RemoteError::Timeout(self.config.timeout)),
        };

        let products: Vec<RemoteProduct> =
            serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        debug!(url = %self.products_url, count = products.len(), "fetched remote products");
        Ok(products)
    }
}
