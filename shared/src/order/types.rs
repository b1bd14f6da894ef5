//! Shared types for order composition and lifecycle

use crate::models::ServingDay;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Selection & Pricing
// ============================================================================

/// Customer's choices for one menu item (session scoped)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Variation group id -> chosen option ids.
    /// A group missing here means "no option chosen".
    #[serde(default)]
    pub variations: BTreeMap<i64, BTreeSet<i64>>,
    /// Add-on id -> on/off
    #[serde(default)]
    pub add_ons: BTreeMap<i64, bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option to a group's choices
    pub fn choose(mut self, group_id: i64, option_id: i64) -> Self {
        self.variations.entry(group_id).or_default().insert(option_id);
        self
    }

    pub fn toggle_add_on(mut self, add_on_id: i64, selected: bool) -> Self {
        self.add_ons.insert(add_on_id, selected);
        self
    }

    pub fn selected_add_ons(&self) -> impl Iterator<Item = i64> + '_ {
        self.add_ons
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| *id)
    }
}

/// Variation option that contributed to a price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedVariation {
    pub group_id: i64,
    pub group_name: String,
    pub option_id: i64,
    pub option_name: String,
    pub price_adjustment: Decimal,
}

/// Add-on that contributed to a price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAddOn {
    pub add_on_id: i64,
    pub name: String,
    pub price: Decimal,
}

/// Itemized price of one cart line. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCalculation {
    pub menu_item_id: i64,
    pub base_price: Decimal,
    /// Sum of chosen variation adjustments (signed)
    pub variation_total: Decimal,
    /// Sum of selected add-on prices
    pub add_on_total: Decimal,
    /// max(0, base + variations + add-ons)
    pub unit_price: Decimal,
    pub quantity: u32,
    /// unit_price * quantity
    pub total_price: Decimal,
    #[serde(default)]
    pub variations: Vec<AppliedVariation>,
    #[serde(default)]
    pub add_ons: Vec<AppliedAddOn>,
}

impl PriceCalculation {
    /// Whether the stored totals agree with each other
    pub fn is_consistent(&self) -> bool {
        self.quantity > 0
            && self.unit_price >= Decimal::ZERO
            && self.unit_price.checked_mul(Decimal::from(self.quantity)) == Some(self.total_price)
    }
}

// ============================================================================
// Cart
// ============================================================================

/// Per-item annotation carried by the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartItemStatus {
    #[default]
    Available,
    /// Item was switched off by the concession after it was added
    Unavailable,
}

/// One line of the customer's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart line id
    pub id: i64,
    pub menu_item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concession_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concession_name: Option<String>,
    pub name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceCalculation>,
    #[serde(default)]
    pub status: CartItemStatus,
    #[serde(default)]
    pub serving_days: BTreeSet<ServingDay>,
}

impl CartItem {
    /// Line total as computed by the pricing calculator (zero when unpriced)
    pub fn total_price(&self) -> Decimal {
        self.pricing
            .as_ref()
            .map(|p| p.total_price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Concession, name and price are all present and coherent
    pub fn has_complete_meta(&self) -> bool {
        self.concession_id.is_some_and(|id| id > 0)
            && !self.name.trim().is_empty()
            && self
                .pricing
                .as_ref()
                .is_some_and(|p| p.quantity == self.quantity && p.is_consistent())
    }
}

/// Days a group of items can be served together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingSchedule {
    /// No single day serves every item in the group
    NoSharedDays,
    Days(BTreeSet<ServingDay>),
}

/// Cart items of a single concession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concession_id: Option<i64>,
    pub concession_name: String,
    pub items: Vec<CartItem>,
    pub total_quantity: u32,
    pub total_amount: Decimal,
    pub shared_serving_days: BTreeSet<ServingDay>,
    pub has_complete_meta: bool,
}

impl CartGroup {
    pub fn serving_schedule(&self) -> ServingSchedule {
        if self.shared_serving_days.is_empty() {
            ServingSchedule::NoSharedDays
        } else {
            ServingSchedule::Days(self.shared_serving_days.clone())
        }
    }

    /// Whether the grouped "place order" action is enabled
    pub fn can_place_order(&self) -> bool {
        self.has_complete_meta
            && !self.items.is_empty()
            && self
                .items
                .iter()
                .all(|i| i.status == CartItemStatus::Available)
    }

    /// Whether "order this item individually" is enabled for a cart line
    pub fn can_order_individually(&self, cart_item_id: i64) -> bool {
        self.has_complete_meta
            && self
                .items
                .iter()
                .any(|i| i.id == cart_item_id && i.status == CartItemStatus::Available)
    }
}

// ============================================================================
// Order Lines
// ============================================================================

/// Frozen snapshot of one ordered line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub menu_item_id: i64,
    pub name: String,
    /// "Group: Option" labels of the chosen variations
    #[serde(default)]
    pub variation_labels: Vec<String>,
    #[serde(default)]
    pub add_on_labels: Vec<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

// ============================================================================
// Actions
// ============================================================================

/// Who is acting on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Customer(i64),
    Concession(i64),
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Customer(id) => write!(f, "customer:{}", id),
            Actor::Concession(id) => write!(f, "concession:{}", id),
        }
    }
}

/// Status-changing action on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    Accept,
    Decline {
        #[serde(default)]
        reason: Option<String>,
    },
    Reschedule {
        /// New requested fulfillment time (Unix millis)
        #[serde(default)]
        requested_time: Option<i64>,
    },
    MarkReady,
    Cancel {
        #[serde(default)]
        reason: Option<String>,
    },
    Complete,
}

impl OrderAction {
    pub fn kind(&self) -> OrderActionKind {
        match self {
            OrderAction::Accept => OrderActionKind::Accept,
            OrderAction::Decline { .. } => OrderActionKind::Decline,
            OrderAction::Reschedule { .. } => OrderActionKind::Reschedule,
            OrderAction::MarkReady => OrderActionKind::MarkReady,
            OrderAction::Cancel { .. } => OrderActionKind::Cancel,
            OrderAction::Complete => OrderActionKind::Complete,
        }
    }
}

/// Payload-free discriminant of [`OrderAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderActionKind {
    Accept,
    Decline,
    Reschedule,
    MarkReady,
    Cancel,
    Complete,
}

impl OrderActionKind {
    pub const ALL: [OrderActionKind; 6] = [
        OrderActionKind::Accept,
        OrderActionKind::Decline,
        OrderActionKind::Reschedule,
        OrderActionKind::MarkReady,
        OrderActionKind::Cancel,
        OrderActionKind::Complete,
    ];
}

impl std::fmt::Display for OrderActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderActionKind::Accept => write!(f, "ACCEPT"),
            OrderActionKind::Decline => write!(f, "DECLINE"),
            OrderActionKind::Reschedule => write!(f, "RESCHEDULE"),
            OrderActionKind::MarkReady => write!(f, "MARK_READY"),
            OrderActionKind::Cancel => write!(f, "CANCEL"),
            OrderActionKind::Complete => write!(f, "COMPLETE"),
        }
    }
}

// ============================================================================
// Payment Proof
// ============================================================================

/// Proof value handed in by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProofSubmission {
    /// Transaction reference
    Text { reference: String },
    /// Opaque reference to an image stored elsewhere
    Screenshot { image_ref: String },
}

/// Proof recorded on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub value: ProofSubmission,
    /// Unix millis
    pub submitted_at: i64,
}
