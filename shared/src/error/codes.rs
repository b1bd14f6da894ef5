//! Unified error codes for the order engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu/pricing errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 2xxx: Permission ====================
    /// Actor may not perform this operation
    PermissionDenied = 2001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Action not allowed from the current status
    InvalidTransition = 4002,
    /// Order changed since it was read
    StaleOrderState = 4003,
    /// Decline/cancel without a reason
    ReasonRequired = 4004,
    /// Reschedule without a new time
    RequestedTimeRequired = 4005,
    /// Cart group is missing concession, name or price data
    IncompleteCartGroup = 4006,
    /// Requested time falls on a day the items are not served
    ServingDayMismatch = 4007,

    // ==================== 5xxx: Payment ====================
    /// Payment proof must be submitted first
    ProofRequired = 5001,
    /// Proof does not match the required mode or is empty
    InvalidProof = 5002,
    /// Concession has no active payment mode
    PaymentModeNotFound = 5003,

    // ==================== 6xxx: Menu ====================
    /// Variation/add-on choice is malformed or out of bounds
    InvalidSelection = 6001,
    /// Menu item not found
    MenuItemNotFound = 6002,
    /// Menu item definition is inconsistent
    InvalidMenuItem = 6003,
    /// Variation options reference each other in a loop
    VariationCycle = 6004,
    /// Menu item is switched off by its concession
    MenuItemUnavailable = 6005,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the caller may refetch and try the same operation again
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::StaleOrderState | ErrorCode::SystemBusy)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Action is not allowed in the current order status",
            ErrorCode::StaleOrderState => "Order was changed by someone else, refresh and retry",
            ErrorCode::ReasonRequired => "A reason is required",
            ErrorCode::RequestedTimeRequired => "A new requested time is required",
            ErrorCode::IncompleteCartGroup => "Cart group has incomplete item data",
            ErrorCode::ServingDayMismatch => "Items are not served on the requested day",

            // Payment
            ErrorCode::ProofRequired => "Payment proof has not been submitted",
            ErrorCode::InvalidProof => "Payment proof is invalid",
            ErrorCode::PaymentModeNotFound => "Payment mode not found",

            // Menu
            ErrorCode::InvalidSelection => "Invalid variation or add-on selection",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::InvalidMenuItem => "Menu item definition is invalid",
            ErrorCode::VariationCycle => "Variation options form a cycle",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System busy, retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::StaleOrderState),
            4004 => Ok(ErrorCode::ReasonRequired),
            4005 => Ok(ErrorCode::RequestedTimeRequired),
            4006 => Ok(ErrorCode::IncompleteCartGroup),
            4007 => Ok(ErrorCode::ServingDayMismatch),

            // Payment
            5001 => Ok(ErrorCode::ProofRequired),
            5002 => Ok(ErrorCode::InvalidProof),
            5003 => Ok(ErrorCode::PaymentModeNotFound),

            // Menu
            6001 => Ok(ErrorCode::InvalidSelection),
            6002 => Ok(ErrorCode::MenuItemNotFound),
            6003 => Ok(ErrorCode::InvalidMenuItem),
            6004 => Ok(ErrorCode::VariationCycle),
            6005 => Ok(ErrorCode::MenuItemUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
