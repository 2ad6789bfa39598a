use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::traits::{ProductSource, RemoteProduct};
use crate::error::RemoteError;

/// In-memory product source. Clones share the same fixture.
#[derive(Clone, Default)]
pub struct MemorySource {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    products: RwLock<Vec<RemoteProduct>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl std::fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySource")
            .field("products", &self.read_products().len())
            .field("unavailable", &self.is_unavailable())
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = RemoteProduct>) -> Self {
        let source = Self::new();
        source.set_products(products);
        source
    }

    pub fn set_products(&self, products: impl IntoIterator<Item = RemoteProduct>) {
        let mut guard = self
            .inner
            .products
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = products.into_iter().collect();
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_unavailable(&self) -> bool {
        self.inner.unavailable.load(Ordering::SeqCst)
    }

    /// Number of fetches attempted, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    fn read_products(&self) -> Vec<RemoteProduct> {
        self.inner
            .products
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProductSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self) -> Result<Vec<RemoteProduct>, RemoteError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        if self.is_unavailable() {
            return Err(RemoteError::Unavailable);
        }
        Ok(self.read_products())
    }
}
