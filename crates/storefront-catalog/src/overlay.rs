//! Session-local overlay of creations, edits and deletions.
//!
//! The overlay never talks to the remote source. It only knows how to lay
//! itself over a freshly fetched base collection:
//!
//! 1. records in `edits` replace the remote record with the same id, in place;
//! 2. edits with no remote counterpart are appended in insertion order;
//! 3. every tombstoned id is dropped, whichever side it came from.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::types::{Product, ProductId};

/// First identifier handed out to locally created products.
pub const FIRST_LOCAL_ID: ProductId = 1000;

#[derive(Debug, Clone)]
pub(crate) struct Overlay {
    edits: IndexMap<ProductId, Product>,
    tombstones: HashSet<ProductId>,
    next_id: ProductId,
}

/// Point-in-time counters describing the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OverlayStats {
    pub edited: usize,
    pub tombstoned: usize,
    pub next_id: ProductId,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            edits: IndexMap::new(),
            tombstones: HashSet::new(),
            next_id: FIRST_LOCAL_ID,
        }
    }
}

impl Overlay {
    pub fn merge(&self, base: Vec<Product>) -> Vec<Product> {
        let mut merged = base;
        let mut positions: HashMap<ProductId, usize> = HashMap::with_capacity(merged.len());
        for (idx, product) in merged.iter().enumerate() {
            positions.entry(product.id).or_insert(idx);
        }
        for (id, edited) in &self.edits {
            match positions.get(id) {
                Some(&idx) => merged[idx] = edited.clone(),
                None => merged.push(edited.clone()),
            }
        }
        merged.retain(|product| !self.tombstones.contains(&product.id));
        merged
    }

    /// What the catalog looks like when the remote source is unreachable.
    pub fn local_view(&self) -> Vec<Product> {
        self.edits
            .values()
            .filter(|product| !self.tombstones.contains(&product.id))
            .cloned()
            .collect()
    }

    pub fn edit(&self, id: ProductId) -> Option<&Product> {
        self.edits.get(&id)
    }

    pub fn allocate_id(&mut self) -> ProductId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn put(&mut self, product: Product) {
        self.edits.insert(product.id, product);
    }

    /// Tombstones `id`; returns whether a local edit was dropped with it.
    pub fn tombstone(&mut self, id: ProductId) -> bool {
        self.tombstones.insert(id);
        self.edits.shift_remove(&id).is_some()
    }

    pub fn stats(&self) -> OverlayStats {
        OverlayStats {
            edited: self.edits.len(),
            tombstoned: self.tombstones.len(),
            next_id: self.next_id,
        }
    }
}
