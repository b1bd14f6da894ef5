//! Order events - immutable facts recorded after an order changed

use super::snapshot::OrderStatus;
use super::types::{Actor, PaymentProof};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: i64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Party that caused this event
    pub actor: Actor,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

impl OrderEvent {
    pub fn new(
        sequence: u64,
        order_id: i64,
        actor: Actor,
        timestamp: i64,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp,
            actor,
            event_type: payload.event_type(),
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    // Lifecycle
    OrderSubmitted,
    OrderAccepted,
    OrderDeclined,
    OrderRescheduled,
    OrderMarkedReady,
    OrderCancelled,
    OrderCompleted,

    // Payment
    ProofSubmitted,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderSubmitted => write!(f, "ORDER_SUBMITTED"),
            OrderEventType::OrderAccepted => write!(f, "ORDER_ACCEPTED"),
            OrderEventType::OrderDeclined => write!(f, "ORDER_DECLINED"),
            OrderEventType::OrderRescheduled => write!(f, "ORDER_RESCHEDULED"),
            OrderEventType::OrderMarkedReady => write!(f, "ORDER_MARKED_READY"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            OrderEventType::OrderCompleted => write!(f, "ORDER_COMPLETED"),
            OrderEventType::ProofSubmitted => write!(f, "PROOF_SUBMITTED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Lifecycle ==========
    OrderSubmitted {
        total_amount: Decimal,
        item_count: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        requested_time: Option<i64>,
    },

    OrderAccepted,

    OrderDeclined {
        reason: String,
    },

    OrderRescheduled {
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_time: Option<i64>,
        requested_time: i64,
    },

    OrderMarkedReady,

    OrderCancelled {
        /// Status the order was cancelled from
        from_status: OrderStatus,
        reason: String,
    },

    OrderCompleted,

    // ========== Payment ==========
    ProofSubmitted {
        proof: PaymentProof,
        /// Whether an earlier proof was overwritten
        replaced: bool,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> OrderEventType {
        match self {
            EventPayload::OrderSubmitted { .. } => OrderEventType::OrderSubmitted,
            EventPayload::OrderAccepted => OrderEventType::OrderAccepted,
            EventPayload::OrderDeclined { .. } => OrderEventType::OrderDeclined,
            EventPayload::OrderRescheduled { .. } => OrderEventType::OrderRescheduled,
            EventPayload::OrderMarkedReady => OrderEventType::OrderMarkedReady,
            EventPayload::OrderCancelled { .. } => OrderEventType::OrderCancelled,
            EventPayload::OrderCompleted => OrderEventType::OrderCompleted,
            EventPayload::ProofSubmitted { .. } => OrderEventType::ProofSubmitted,
        }
    }
}
