//! Appliers for the forward steps: accept, mark ready, complete

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent, OrderStatus};

/// OrderAccepted applier
pub struct OrderAcceptedApplier;

impl EventApplier for OrderAcceptedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderAccepted = &event.payload {
            order.status = OrderStatus::Confirmed;
            order.updated_at = event.timestamp;
        }
    }
}

/// OrderMarkedReady applier
pub struct OrderMarkedReadyApplier;

impl EventApplier for OrderMarkedReadyApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderMarkedReady = &event.payload {
            order.status = OrderStatus::Ready;
            order.updated_at = event.timestamp;
        }
    }
}

/// OrderCompleted applier
pub struct OrderCompletedApplier;

impl EventApplier for OrderCompletedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::OrderCompleted = &event.payload {
            order.status = OrderStatus::Completed;
            order.updated_at = event.timestamp;
        }
    }
}
