//! Pricing Module
//!
//! Deterministic item pricing and the category-wide price adjustment check.
//! Neither holds state; both are safe to call from any number of threads.

mod calculator;
mod category_validator;
pub mod money;

pub use calculator::*;
pub use category_validator::*;
