//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles one event
//! type. Appliers are pure and bump `updated_at` to the event time; the
//! version is owned by storage.

use enum_dispatch::enum_dispatch;

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

mod order_closed;
mod order_rescheduled;
mod order_submitted;
mod proof_submitted;
mod status_advanced;

pub use order_closed::{OrderCancelledApplier, OrderDeclinedApplier};
pub use order_rescheduled::OrderRescheduledApplier;
pub use order_submitted::OrderSubmittedApplier;
pub use proof_submitted::ProofSubmittedApplier;
pub use status_advanced::{OrderAcceptedApplier, OrderCompletedApplier, OrderMarkedReadyApplier};

/// EventAction enum - dispatches to concrete applier implementations
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderSubmitted(OrderSubmittedApplier),
    OrderAccepted(OrderAcceptedApplier),
    OrderDeclined(OrderDeclinedApplier),
    OrderRescheduled(OrderRescheduledApplier),
    OrderMarkedReady(OrderMarkedReadyApplier),
    OrderCancelled(OrderCancelledApplier),
    OrderCompleted(OrderCompletedApplier),
    ProofSubmitted(ProofSubmittedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderSubmitted { .. } => EventAction::OrderSubmitted(OrderSubmittedApplier),
            EventPayload::OrderAccepted => EventAction::OrderAccepted(OrderAcceptedApplier),
            EventPayload::OrderDeclined { .. } => EventAction::OrderDeclined(OrderDeclinedApplier),
            EventPayload::OrderRescheduled { .. } => {
                EventAction::OrderRescheduled(OrderRescheduledApplier)
            }
            EventPayload::OrderMarkedReady => EventAction::OrderMarkedReady(OrderMarkedReadyApplier),
            EventPayload::OrderCancelled { .. } => EventAction::OrderCancelled(OrderCancelledApplier),
            EventPayload::OrderCompleted => EventAction::OrderCompleted(OrderCompletedApplier),
            EventPayload::ProofSubmitted { .. } => EventAction::ProofSubmitted(ProofSubmittedApplier),
        }
    }
}
