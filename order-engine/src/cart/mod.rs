//! Cart Module

mod aggregator;

pub use aggregator::{build_cart_groups, flatten_groups};
