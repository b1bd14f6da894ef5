//! OrderRescheduled event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// OrderRescheduled applier
pub struct OrderRescheduledApplier;

impl EventApplier for OrderRescheduledApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderRescheduled { requested_time, .. } = &event.payload {
            order.requested_time = Some(*requested_time);
            order.updated_at = event.timestamp;
        }
    }
}
