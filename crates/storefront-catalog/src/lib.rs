//! Product catalog with a session-local write overlay.
//!
//! The remote product API is read-only. [`CatalogStore`] layers creations,
//! edits and deletions on top of it so callers see a writable catalog for the
//! lifetime of the store. Nothing is persisted.

pub mod config;
pub mod error;
pub mod overlay;
pub mod query;
pub mod source;
pub mod store;
pub mod types;

pub use config::{CatalogConfig, SourceConfig};
pub use error::{CatalogError, CatalogResult, ConfigError, RemoteError};
pub use overlay::{FIRST_LOCAL_ID, OverlayStats};
pub use query::{CatalogSummary, ProductQuery, distinct_categories};
pub use source::{
    DEFAULT_DESCRIPTION, DynSource, HttpProductSource, MemorySource, ProductSource, RemoteProduct,
};
pub use store::CatalogStore;
pub use types::{DeleteConfirmation, NewProduct, Product, ProductId, ProductPatch, Rating};
