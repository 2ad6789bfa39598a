//! Filters and aggregates computed over a merged product list.

use indexmap::IndexSet;
use serde::Serialize;

use crate::types::Product;

/// Search filter. `None` fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring matched against title or description.
    pub text: Option<String>,
    /// Exact, case-sensitive category match.
    pub category: Option<String>,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_text(product) && self.matches_category(product)
    }

    fn matches_text(&self, product: &Product) -> bool {
        let Some(term) = self.text.as_deref() else {
            return true;
        };
        let term = term.to_lowercase();
        product.title.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| product.category == category)
    }

    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct categories in first-seen order.
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Headline numbers for a catalog view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_products: usize,
    pub total_value: f64,
    pub category_count: usize,
}

impl CatalogSummary {
    pub fn of(products: &[Product]) -> Self {
        Self {
            total_products: products.len(),
            total_value: products.iter().map(|p| p.price).sum(),
            category_count: distinct_categories(products).len(),
        }
    }
}
