//! Catalog record shapes shared by the overlay store and its callers.

use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// Aggregate customer rating attached to a product.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

impl Rating {
    /// Rating given to every locally created product.
    pub fn unrated() -> Self {
        Self {
            rate: 0.0,
            count: 0,
        }
    }
}

/// A catalog item as presented to callers after the overlay merge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Payload for creating a product; the store assigns the identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    /// Accepted for shape compatibility but never honored: new items start unrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl NewProduct {
    pub fn new(title: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price,
            description: String::new(),
            category: category.into(),
            image: String::new(),
            rating: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub(crate) fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            rating: Some(Rating::unrated()),
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl ProductPatch {
    pub fn price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Field-by-field merge onto `base`. The identifier is never touched.
    pub fn apply_to(&self, base: &Product) -> Product {
        let mut merged = base.clone();
        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(price) = self.price {
            merged.price = price;
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(category) = &self.category {
            merged.category = category.clone();
        }
        if let Some(image) = &self.image {
            merged.image = image.clone();
        }
        if let Some(rating) = self.rating {
            merged.rating = Some(rating);
        }
        merged
    }
}

/// Acknowledgement returned by delete. Identical whether or not the id existed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub id: ProductId,
    pub message: String,
}

impl DeleteConfirmation {
    pub(crate) fn new(id: ProductId) -> Self {
        Self {
            id,
            message: format!("Product {id} deleted successfully"),
        }
    }
}
