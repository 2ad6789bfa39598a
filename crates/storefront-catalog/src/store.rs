use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult, RemoteError};
use crate::overlay::{Overlay, OverlayStats};
use crate::query::{CatalogSummary, ProductQuery, distinct_categories};
use crate::source::ProductSource;
use crate::types::{DeleteConfirmation, NewProduct, Product, ProductId, ProductPatch};

/// Makes a read-only product source look writable for one session.
///
/// Every read fetches the base collection afresh and lays the overlay over it.
/// Writes never reach the source. All overlay state sits behind a single async
/// mutex; writes hold it for their whole duration, so they are serialized per
/// store, including the nested fetch in `update`'s fallback path.
pub struct CatalogStore<S> {
    source: S,
    overlay: Mutex<Overlay>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for CatalogStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<S: ProductSource> CatalogStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            overlay: Mutex::new(Overlay::default()),
        }
    }

    async fn fetch_base(&self) -> Result<Vec<Product>, RemoteError> {
        let raw = self.source.fetch_all().await?;
        Ok(raw.into_iter().map(|p| p.into_product()).collect())
    }

    fn merged_view(
        &self,
        overlay: &Overlay,
        fetched: Result<Vec<Product>, RemoteError>,
    ) -> Vec<Product> {
        match fetched {
            Ok(base) => {
                let merged = overlay.merge(base);
                debug!(source = self.source.name(), count = merged.len(), "merged catalog view");
                merged
            }
            Err(err) => {
                let local = overlay.local_view();
                warn!(
                    source = self.source.name(),
                    error = %err,
                    local = local.len(),
                    "remote product fetch failed; serving local records only"
                );
                local
            }
        }
    }

    /// Merged catalog. A failed remote fetch degrades to local records, never an error.
    pub async fn list(&self) -> Vec<Product> {
        let fetched = self.fetch_base().await;
        let overlay = self.overlay.lock().await;
        self.merged_view(&overlay, fetched)
    }

    pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
        find(self.list().await, id)
    }

    /// Distinct categories of the merged catalog, in first-seen order.
    pub async fn list_categories(&self) -> Vec<String> {
        distinct_categories(&self.list().await)
    }

    pub async fn list_by_category(&self, category: &str) -> Vec<Product> {
        self.search(&ProductQuery::new().category(category)).await
    }

    pub async fn search(&self, query: &ProductQuery) -> Vec<Product> {
        query.apply(self.list().await)
    }

    pub async fn summary(&self) -> CatalogSummary {
        CatalogSummary::of(&self.list().await)
    }

    pub async fn overlay_stats(&self) -> OverlayStats {
        self.overlay.lock().await.stats()
    }

    /// Adds a local product. Any rating in the payload is replaced with an unrated one.
    pub async fn create(&self, payload: NewProduct) -> CatalogResult<Product> {
        check_title(&payload.title)?;
        check_category(&payload.category)?;
        check_price(payload.price)?;
        let mut overlay = self.overlay.lock().await;
        let id = overlay.allocate_id();
        let product = payload.into_product(id);
        overlay.put(product.clone());
        debug!(id, title = %product.title, "created local product");
        Ok(product)
    }

    /// Merges `patch` onto the current record. Only fields the patch sets are validated,
    /// so records that arrived from the source with blank fields stay updatable.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> CatalogResult<Product> {
        validate_patch(&patch)?;
        let mut overlay = self.overlay.lock().await;
        let current = match overlay.edit(id) {
            Some(existing) => existing.clone(),
            None => {
                let fetched = self.fetch_base().await;
                find(self.merged_view(&overlay, fetched), id)?
            }
        };
        let updated = patch.apply_to(&current);
        overlay.put(updated.clone());
        debug!(id, "updated product in overlay");
        Ok(updated)
    }

    /// Tombstones `id`. Succeeds whether or not the product exists.
    pub async fn delete(&self, id: ProductId) -> DeleteConfirmation {
        let mut overlay = self.overlay.lock().await;
        let dropped_edit = overlay.tombstone(id);
        debug!(id, dropped_edit, "tombstoned product");
        DeleteConfirmation::new(id)
    }
}

fn find(products: Vec<Product>, id: ProductId) -> CatalogResult<Product> {
    products
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(CatalogError::NotFound { id })
}

fn validate_patch(patch: &ProductPatch) -> CatalogResult<()> {
    if let Some(title) = &patch.title {
        check_title(title)?;
    }
    if let Some(category) = &patch.category {
        check_category(category)?;
    }
    if let Some(price) = patch.price {
        check_price(price)?;
    }
    Ok(())
}

fn check_title(title: &str) -> CatalogResult<()> {
    if title.trim().is_empty() {
        return Err(CatalogError::InvalidInput("title must not be empty".into()));
    }
    Ok(())
}

fn check_category(category: &str) -> CatalogResult<()> {
    if category.trim().is_empty() {
        return Err(CatalogError::InvalidInput("category must not be empty".into()));
    }
    Ok(())
}

fn check_price(price: f64) -> CatalogResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::InvalidInput(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::overlay::FIRST_LOCAL_ID;
    use crate::source::{DEFAULT_DESCRIPTION, MemorySource, RemoteProduct};
    use crate::types::Rating;

    fn remote(id: ProductId, title: &str, price: f64, category: &str) -> RemoteProduct {
        RemoteProduct {
            id,
            title: title.into(),
            price,
            description: None,
            category: category.into(),
            image: Some(format!("https://img/{id}.png")),
            rating: Some(Rating {
                rate: 4.0,
                count: 10,
            }),
        }
    }

    fn espresso_store() -> (MemorySource, CatalogStore<MemorySource>) {
        let source = MemorySource::with_products([remote(1, "Espresso", 3.5, "coffee")]);
        (source.clone(), CatalogStore::new(source))
    }

    fn latte() -> NewProduct {
        NewProduct::new("Latte", 4.0, "coffee")
    }

    #[tokio::test]
    async fn create_assigns_local_id_and_appends() {
        let (_, store) = espresso_store();
        let created = store.create(latte()).await.expect("create");
        assert_eq!(created.id, 1000);
        assert_eq!(created.title, "Latte");
        assert_eq!(created.price, 4.0);
        assert_eq!(created.category, "coffee");
        assert_eq!(created.rating, Some(Rating::unrated()));

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 1);
        assert_eq!(listed[1], created);
    }

    #[tokio::test]
    async fn create_overrides_supplied_rating() {
        let (_, store) = espresso_store();
        let mut payload = latte();
        payload.rating = Some(Rating {
            rate: 5.0,
            count: 999,
        });
        let created = store.create(payload).await.expect("create");
        assert_eq!(created.rating, Some(Rating::unrated()));
    }

    #[tokio::test]
    async fn delete_remote_record_leaves_local_creation() {
        let (_, store) = espresso_store();
        store.create(latte()).await.expect("create");
        let confirmation = store.delete(1).await;
        assert_eq!(confirmation.message, "Product 1 deleted successfully");

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 1000);
        assert_eq!(store.get(1).await, Err(CatalogError::NotFound { id: 1 }));
    }

    #[tokio::test]
    async fn update_remote_record_overrides_only_patched_fields() {
        let (_, store) = espresso_store();
        store.create(latte()).await.expect("create");
        let before = store.get(1).await.expect("get before");

        store.update(1, ProductPatch::price(5.0)).await.expect("update");
        let after = store.get(1).await.expect("get after");
        assert_eq!(after.price, 5.0);
        assert_eq!(after.title, "Espresso");
        assert_eq!(after.category, "coffee");
        assert_eq!(after.description, DEFAULT_DESCRIPTION);
        assert_eq!(Product { price: before.price, ..after.clone() }, before);

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, 1);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (_, store) = espresso_store();
        let err = store
            .update(9999, ProductPatch::price(1.0))
            .await
            .expect_err("missing id");
        assert_eq!(err, CatalogError::NotFound { id: 9999 });
        assert_eq!(store.overlay_stats().await.edited, 0);
    }

    #[tokio::test]
    async fn update_checks_only_patched_fields() {
        let source = MemorySource::with_products([remote(7, "Filter Roast", 9.0, "")]);
        let store = CatalogStore::new(source);

        let updated = store.update(7, ProductPatch::price(5.0)).await.expect("update");
        assert_eq!(updated.price, 5.0);
        assert_eq!(updated.category, "");
        assert_eq!(store.get(7).await.expect("get").price, 5.0);

        let blank = ProductPatch {
            category: Some(" ".into()),
            ..ProductPatch::default()
        };
        let err = store.update(7, blank).await.expect_err("blank category");
        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert_eq!(store.get(7).await.expect("get").price, 5.0);
    }

    #[tokio::test]
    async fn update_local_record_skips_remote_fetch() {
        let (source, store) = espresso_store();
        let created = store.create(latte()).await.expect("create");
        let fetches = source.fetch_count();

        let updated = store
            .update(created.id, ProductPatch::title("Flat White"))
            .await
            .expect("update");
        assert_eq!(updated.title, "Flat White");
        assert_eq!(updated.rating, Some(Rating::unrated()));
        assert_eq!(source.fetch_count(), fetches);
    }

    #[tokio::test]
    async fn update_tombstoned_id_is_not_found() {
        let (_, store) = espresso_store();
        store.delete(1).await;
        let err = store.update(1, ProductPatch::price(2.0)).await.expect_err("deleted");
        assert_eq!(err, CatalogError::NotFound { id: 1 });
    }

    #[tokio::test]
    async fn tombstone_dominates_edits_and_remote() {
        let (_, store) = espresso_store();
        store.update(1, ProductPatch::price(9.0)).await.expect("update");
        let created = store.create(latte()).await.expect("create");

        store.delete(1).await;
        store.delete(created.id).await;

        assert!(store.list().await.is_empty());
        assert!(store.get(1).await.is_err());
        assert!(store.get(created.id).await.is_err());
        let stats = store.overlay_stats().await;
        assert_eq!(stats.edited, 0);
        assert_eq!(stats.tombstoned, 2);
    }

    #[tokio::test]
    async fn delete_missing_id_is_silent() {
        let (_, store) = espresso_store();
        let first = store.delete(42).await;
        let again = store.delete(42).await;
        assert_eq!(first, again);
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn local_ids_increase_and_skip_remote_range() {
        let source =
            MemorySource::with_products((1..=20).map(|id| remote(id, "Item", 1.0, "misc")));
        let store = CatalogStore::new(source);
        let mut last = 0;
        for _ in 0..5 {
            let created = store.create(latte()).await.expect("create");
            assert!(created.id >= FIRST_LOCAL_ID);
            assert!(created.id > last);
            assert!(created.id > 20);
            last = created.id;
        }
        store.delete(last).await;
        let next = store.create(latte()).await.expect("create");
        assert_eq!(next.id, last + 1);
    }

    #[tokio::test]
    async fn repeated_reads_are_equal_and_each_fetches() {
        let (source, store) = espresso_store();
        store.create(latte()).await.expect("create");
        store.update(1, ProductPatch::price(6.0)).await.expect("update");

        let before = source.fetch_count();
        let first = store.list().await;
        let second = store.list().await;
        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), before + 2);
    }

    #[tokio::test]
    async fn unavailable_remote_degrades_to_local_records() {
        let (source, store) = espresso_store();
        let latte = store.create(latte()).await.expect("create");
        let mocha = store.create(NewProduct::new("Mocha", 4.5, "coffee")).await.expect("create");
        store.delete(mocha.id).await;

        source.set_unavailable(true);
        assert_eq!(store.list().await, vec![latte.clone()]);
        assert_eq!(store.get(1).await, Err(CatalogError::NotFound { id: 1 }));

        source.set_unavailable(false);
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn unavailable_remote_blocks_fallback_update() {
        let (source, store) = espresso_store();
        source.set_unavailable(true);
        let err = store.update(1, ProductPatch::price(2.0)).await.expect_err("offline");
        assert_eq!(err, CatalogError::NotFound { id: 1 });
    }

    #[tokio::test]
    async fn categories_and_category_listing() {
        let source = MemorySource::with_products([
            remote(1, "Espresso", 3.5, "coffee"),
            remote(2, "Sencha", 2.5, "tea"),
            remote(3, "Ristretto", 3.0, "coffee"),
        ]);
        let store = CatalogStore::new(source);
        store.create(NewProduct::new("Tote", 12.0, "merch")).await.expect("create");
        let recategorize = ProductPatch {
            category: Some("Tea".into()),
            ..ProductPatch::default()
        };
        store.update(2, recategorize).await.expect("update");

        assert_eq!(store.list_categories().await, vec!["coffee", "Tea", "merch"]);
        let coffee = store.list_by_category("coffee").await;
        assert_eq!(coffee.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);
        assert!(store.list_by_category("tea").await.is_empty());
    }

    #[tokio::test]
    async fn search_and_summary_use_merged_view() {
        let (_, store) = espresso_store();
        store
            .create(latte().with_description("Milky espresso drink"))
            .await
            .expect("create");

        let hits = store.search(&ProductQuery::new().text("ESPRESSO")).await;
        assert_eq!(hits.len(), 2);

        let summary = store.summary().await;
        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.total_value, 7.5);
        assert_eq!(summary.category_count, 1);
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected_without_side_effects() {
        let (_, store) = espresso_store();
        let err = store
            .create(NewProduct::new("  ", 1.0, "coffee"))
            .await
            .expect_err("blank title");
        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert!(store.create(NewProduct::new("Latte", -1.0, "coffee")).await.is_err());
        assert!(store.create(NewProduct::new("Latte", f64::NAN, "coffee")).await.is_err());
        assert!(store.create(NewProduct::new("Latte", 1.0, "")).await.is_err());

        let err = store.update(1, ProductPatch::price(-3.0)).await.expect_err("negative");
        assert!(matches!(err, CatalogError::InvalidInput(_)));

        let stats = store.overlay_stats().await;
        assert_eq!(stats.edited, 0);
        assert_eq!(stats.next_id, FIRST_LOCAL_ID);
        assert_eq!(store.get(1).await.expect("get").price, 3.5);
    }

    #[tokio::test]
    async fn concurrent_writes_get_distinct_ids() {
        let (_, store) = espresso_store();
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .create(NewProduct::new(format!("Blend {i}"), 1.0, "coffee"))
                    .await
                    .expect("create")
                    .id
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("join"));
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(store.list().await.len(), 17);
    }
}
