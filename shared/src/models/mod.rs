//! Data models
//!
//! Catalog records owned by a concession. Read-only to customers.
//! All IDs are `i64`.

pub mod category;
pub mod menu_item;
pub mod payment_mode;

// Re-exports
pub use category::*;
pub use menu_item::*;
pub use payment_mode::*;
