//! Core traits for the order lifecycle
//!
//! - [`OrderActionHandler`]: validates one action against an order and
//!   produces the event payload describing the change
//! - [`EventApplier`]: applies a recorded event to the order snapshot
//!
//! Both are pure. Persistence happens in the manager.

use chrono::FixedOffset;
use enum_dispatch::enum_dispatch;
use shared::ErrorCode;
use shared::models::ServingDay;
use shared::order::{Actor, EventPayload, Order, OrderActionKind, OrderEvent, OrderStatus};
use thiserror::Error;

/// Errors raised while deciding an order mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Cannot {action} order {order_id} in status {from}")]
    InvalidTransition {
        order_id: i64,
        from: OrderStatus,
        action: OrderActionKind,
    },

    #[error("Order {order_id} is at version {actual}, caller expected {expected}")]
    StaleOrderState {
        order_id: i64,
        expected: u64,
        actual: u64,
    },

    #[error("Order {0} needs payment proof before it can be marked ready")]
    ProofRequired(i64),

    #[error("A reason is required to {0}")]
    ReasonRequired(OrderActionKind),

    #[error("A new requested time is required to reschedule")]
    RequestedTimeRequired,

    #[error("Invalid payment proof: {0}")]
    InvalidProof(String),

    #[error("Order {order_id} no longer accepts payment proof (status {status})")]
    ProofClosed { order_id: i64, status: OrderStatus },

    #[error("{actor} may not {action} order {order_id}")]
    Forbidden {
        order_id: i64,
        actor: Actor,
        action: String,
    },

    #[error("Items are not served on {day}")]
    ServingDayMismatch { day: ServingDay },

    #[error("Requested time {0} is not a valid timestamp")]
    InvalidRequestedTime(i64),

    #[error("Cart group cannot be ordered: {0}")]
    IncompleteCartGroup(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Menu item {0} is not available")]
    MenuItemUnavailable(i64),

    #[error("Concession {0} has no active payment mode")]
    PaymentModeNotFound(i64),
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            OrderError::InvalidTransition { .. } | OrderError::ProofClosed { .. } => {
                ErrorCode::InvalidTransition
            }
            OrderError::StaleOrderState { .. } => ErrorCode::StaleOrderState,
            OrderError::ProofRequired(_) => ErrorCode::ProofRequired,
            OrderError::ReasonRequired(_) => ErrorCode::ReasonRequired,
            OrderError::RequestedTimeRequired => ErrorCode::RequestedTimeRequired,
            OrderError::InvalidProof(_) => ErrorCode::InvalidProof,
            OrderError::Forbidden { .. } => ErrorCode::PermissionDenied,
            OrderError::ServingDayMismatch { .. } => ErrorCode::ServingDayMismatch,
            OrderError::InvalidRequestedTime(_) => ErrorCode::ValueOutOfRange,
            OrderError::IncompleteCartGroup(_) => ErrorCode::IncompleteCartGroup,
            OrderError::MenuItemNotFound(_) => ErrorCode::MenuItemNotFound,
            OrderError::MenuItemUnavailable(_) => ErrorCode::MenuItemUnavailable,
            OrderError::PaymentModeNotFound(_) => ErrorCode::PaymentModeNotFound,
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Inputs every action sees besides the order itself
#[derive(Debug, Clone, Copy)]
pub struct ActionContext {
    pub actor: Actor,
    /// Decision time (Unix millis)
    pub now: i64,
    /// Business time zone offset used to resolve serving days
    pub offset: FixedOffset,
}

impl ActionContext {
    pub fn new(actor: Actor, now: i64, offset: FixedOffset) -> Self {
        Self { actor, now, offset }
    }
}

/// Validates an action and describes its effect
#[enum_dispatch]
pub trait OrderActionHandler {
    fn execute(&self, order: &Order, ctx: &ActionContext) -> OrderResult<EventPayload>;
}

/// Applies one event to an order snapshot
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent);
}
