//! Shared types for the campus order engine
//!
//! Plain data records exchanged with UI/API callers and storage:
//! catalog models, order types, and error codes.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use error::{CommandError, ErrorCategory, ErrorCode};
