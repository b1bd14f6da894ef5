//! Catalog Module
//!
//! Checks applied when a concession saves a menu item (prices, ids, option
//! targets, the category/filter rule, the variation graph) and the read-only
//! catalog seam the order flow consumes.

mod graph;
mod store;
mod validation;

pub use graph::VariationGraph;
pub use store::{CatalogStore, MemoryCatalog};
pub use validation::*;
