use crate::orders::storage::StorageError;
use crate::orders::traits::OrderError;
use crate::pricing::PricingError;
use shared::error::{CommandError, ErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Failed to prepare work directory: {0}")]
    Io(#[from] std::io::Error),
}

impl ManagerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ManagerError::Storage(e) => classify_storage_error(e),
            ManagerError::Order(e) => e.code(),
            ManagerError::Pricing(_) => ErrorCode::InvalidSelection,
            ManagerError::Io(_) => ErrorCode::InternalError,
        }
    }
}

/// Version conflicts and missing orders surface as order errors, not storage failures
impl From<StorageError> for ManagerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::StaleOrderState {
                order_id,
                expected,
                actual,
            } => ManagerError::Order(OrderError::StaleOrderState {
                order_id,
                expected,
                actual,
            }),
            StorageError::OrderNotFound(id) => ManagerError::Order(OrderError::OrderNotFound(id)),
            other => ManagerError::Storage(other),
        }
    }
}

/// Map a storage failure to an error code
///
/// Stale versions and missing orders never reach here; `From<StorageError>`
/// turns them into order errors.
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if let StorageError::Serialization(_) = e {
        return ErrorCode::InternalError;
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let code = err.code();
        if let ManagerError::Storage(e) = &err {
            tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
        }
        CommandError::new(code, err.to_string())
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
