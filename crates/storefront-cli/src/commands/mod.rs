pub mod read;
pub mod session;

use anyhow::Result;
use serde_json::json;
use storefront_catalog::{
    CatalogStore, NewProduct, ProductId, ProductPatch, ProductQuery, ProductSource,
};

use crate::output::{self, Rendered};

/// A single catalog operation, shared by one-shot commands and sessions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List(ProductQuery),
    Get(ProductId),
    Categories,
    Category(String),
    Summary,
    Stats,
    Create(NewProduct),
    Update(ProductId, ProductPatch),
    Delete(ProductId),
}

pub async fn execute<S: ProductSource>(store: &CatalogStore<S>, action: Action) -> Result<Rendered> {
    let rendered = match action {
        Action::List(query) => {
            let products = store.search(&query).await;
            let human = output::product_lines(&products);
            Rendered::new(serde_json::to_value(&products)?, human)
        }
        Action::Get(id) => {
            let product = store.get(id).await?;
            let human = output::product_detail(&product);
            Rendered::new(serde_json::to_value(&product)?, human)
        }
        Action::Categories => {
            let categories = store.list_categories().await;
            let human = categories.join("\n");
            Rendered::new(json!(categories), human)
        }
        Action::Category(category) => {
            let products = store.list_by_category(&category).await;
            let human = output::product_lines(&products);
            Rendered::new(serde_json::to_value(&products)?, human)
        }
        Action::Summary => {
            let summary = store.summary().await;
            let human = output::summary_text(&summary);
            Rendered::new(serde_json::to_value(&summary)?, human)
        }
        Action::Stats => {
            let stats = store.overlay_stats().await;
            let human = output::stats_text(&stats);
            Rendered::new(serde_json::to_value(stats)?, human)
        }
        Action::Create(payload) => {
            let product = store.create(payload).await?;
            let human = format!("created {}", output::product_line(&product));
            Rendered::new(serde_json::to_value(&product)?, human)
        }
        Action::Update(id, patch) => {
            let product = store.update(id, patch).await?;
            let human = format!("updated {}", output::product_line(&product));
            Rendered::new(serde_json::to_value(&product)?, human)
        }
        Action::Delete(id) => {
            let confirmation = store.delete(id).await;
            let human = confirmation.message.clone();
            Rendered::new(serde_json::to_value(&confirmation)?, human)
        }
    };
    Ok(rendered)
}
