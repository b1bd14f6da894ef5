//! Unified error system for the order engine
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`CommandError`]: Serializable error surface handed back to callers
//!
//! # Example
//!
//! ```
//! use shared::error::{CommandError, ErrorCode};
//!
//! let err = CommandError::new(ErrorCode::StaleOrderState, "order 7 moved to version 3");
//! assert!(err.code.is_retryable());
//! ```

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};

use serde::{Deserialize, Serialize};

/// Error handed back to UI/API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error carrying only the code's default message
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.message())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}
