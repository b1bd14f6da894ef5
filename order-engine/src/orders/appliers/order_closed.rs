//! Appliers for the unhappy endings: decline and cancel
//!
//! Both keep the reason on the order.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent, OrderStatus};

/// OrderDeclined applier
pub struct OrderDeclinedApplier;

impl EventApplier for OrderDeclinedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderDeclined { reason } = &event.payload {
            order.status = OrderStatus::Declined;
            order.reason = Some(reason.clone());
            order.updated_at = event.timestamp;
        }
    }
}

/// OrderCancelled applier
pub struct OrderCancelledApplier;

impl EventApplier for OrderCancelledApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderCancelled { reason, .. } = &event.payload {
            order.status = OrderStatus::Cancelled;
            order.reason = Some(reason.clone());
            order.updated_at = event.timestamp;
        }
    }
}
