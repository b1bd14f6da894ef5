//! OrderSubmitted event applier
//!
//! Seeds a freshly built order in PENDING.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent, OrderStatus};

/// OrderSubmitted applier
pub struct OrderSubmittedApplier;

impl EventApplier for OrderSubmittedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderSubmitted {
            total_amount,
            requested_time,
            ..
        } = &event.payload
        {
            order.id = event.order_id;
            order.status = OrderStatus::Pending;
            order.total_amount = *total_amount;
            order.requested_time = *requested_time;
            order.proof = None;
            order.reason = None;
            order.created_at = event.timestamp;
            order.updated_at = event.timestamp;
        }
    }
}
