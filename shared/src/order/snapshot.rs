//! Order snapshot - the persisted order record
//!
//! Line items and totals are frozen at submission. Status, proof, reason and
//! requested time move afterwards, each move bumping `version`.

use super::types::{LineItem, OrderActionKind, PaymentProof};
use crate::models::{PaymentMode, ProofMode, ServingDay};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Ready,
    Completed,
    Declined,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Declined,
        OrderStatus::Cancelled,
    ];

    /// No action leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Declined | OrderStatus::Cancelled
        )
    }

    /// Actions listed for this status in the transition table
    pub fn allowed_actions(&self) -> &'static [OrderActionKind] {
        match self {
            OrderStatus::Pending => &[
                OrderActionKind::Accept,
                OrderActionKind::Decline,
                OrderActionKind::Reschedule,
            ],
            OrderStatus::Confirmed => &[OrderActionKind::MarkReady, OrderActionKind::Cancel],
            OrderStatus::Ready => &[OrderActionKind::Complete, OrderActionKind::Cancel],
            OrderStatus::Completed | OrderStatus::Declined | OrderStatus::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Confirmed => write!(f, "CONFIRMED"),
            OrderStatus::Ready => write!(f, "READY"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
            OrderStatus::Declined => write!(f, "DECLINED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Whether the payment method asks the customer for proof
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProofRequirement {
    NotRequired,
    Required(ProofMode),
}

impl ProofRequirement {
    /// A mode that needs proof but names no proof mode falls back to text
    pub fn from_mode(mode: &PaymentMode) -> Self {
        if mode.needs_proof {
            ProofRequirement::Required(mode.proof_mode.unwrap_or(ProofMode::Text))
        } else {
            ProofRequirement::NotRequired
        }
    }
}

/// Payment method snapshot taken at submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayment {
    pub payment_mode_id: i64,
    pub label: String,
    #[serde(default)]
    pub details: String,
    pub proof_requirement: ProofRequirement,
}

impl From<&PaymentMode> for OrderPayment {
    fn from(mode: &PaymentMode) -> Self {
        Self {
            payment_mode_id: mode.id,
            label: mode.label.clone(),
            details: mode.details.clone(),
            proof_requirement: ProofRequirement::from_mode(mode),
        }
    }
}

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Assigned by storage
    pub id: i64,
    pub customer_id: i64,
    pub concession_id: i64,
    pub concession_name: String,
    pub line_items: Vec<LineItem>,
    pub total_amount: Decimal,
    /// Requested fulfillment time (Unix millis); None = as soon as possible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_time: Option<i64>,
    /// Days every ordered item is served on
    #[serde(default)]
    pub serving_days: BTreeSet<ServingDay>,
    pub status: OrderStatus,
    pub payment: OrderPayment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<PaymentProof>,
    /// Decline or cancellation reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Optimistic concurrency token, bumped on every save
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Whether the payment proof gate lets the order move past CONFIRMED
    pub fn proof_satisfied(&self) -> bool {
        match self.payment.proof_requirement {
            ProofRequirement::NotRequired => true,
            ProofRequirement::Required(_) => self.proof.is_some(),
        }
    }

    pub fn item_count(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }
}
