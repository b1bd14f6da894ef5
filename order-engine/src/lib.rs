//! Campus cafeteria order engine
//!
//! Composes customer orders from a concession's menu and drives them through
//! their lifecycle.
//!
//! # Module structure
//!
//! ```text
//! order-engine/src/
//! ├── core/          # Configuration
//! ├── catalog/       # Catalog collaborator, write-time checks, variation graph
//! ├── pricing/       # Item price calculator, category adjustment validator
//! ├── cart/          # Cart grouping per concession
//! ├── orders/        # Submission, lifecycle, proof, storage, manager
//! └── utils/         # Logging
//! ```

pub mod cart;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export public types
pub use cart::{build_cart_groups, flatten_groups};
pub use catalog::{CatalogError, CatalogStore, MemoryCatalog};
pub use core::EngineConfig;
pub use orders::{ManagerError, OrderError, OrderStorage, OrdersManager};
pub use pricing::{PricingError, calculate_price, validate_category_adjustment};

// Re-export logger functions
pub use utils::logger::{init_from_config, init_logger, init_logger_with_file};
