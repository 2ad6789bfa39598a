use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::types::{Product, ProductId, Rating};

/// Description substituted when the remote source omits one.
pub const DEFAULT_DESCRIPTION: &str = "A delicious coffee product";

/// Read-only provider of the authoritative base collection.
///
/// Every call is expected to hit the source afresh; the overlay store never
/// caches the result between reads.
#[async_trait]
pub trait ProductSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_all(&self) -> Result<Vec<RemoteProduct>, RemoteError>;
}

pub type DynSource = Arc<dyn ProductSource>;

#[async_trait]
impl<T: ProductSource + ?Sized> ProductSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteProduct>, RemoteError> {
        (**self).fetch_all().await
    }
}

/// Product as it arrives from the remote source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl RemoteProduct {
    pub fn into_product(self) -> Product {
        let description = match self.description {
            Some(text) if !text.is_empty() => text,
            _ => DEFAULT_DESCRIPTION.to_string(),
        };
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            description,
            category: self.category,
            image: self.image.unwrap_or_default(),
            rating: self.rating,
        }
    }
}
