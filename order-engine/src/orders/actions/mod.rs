//! Lifecycle action implementations
//!
//! Each action implements [`OrderActionHandler`] and checks the
//! preconditions of one row of the transition table. The status/action
//! pair itself is checked by the caller before dispatch.

use enum_dispatch::enum_dispatch;

use crate::orders::traits::{ActionContext, OrderActionHandler, OrderResult};
use shared::order::{EventPayload, Order, OrderAction};

mod accept;
mod cancel;
mod complete;
mod decline;
mod mark_ready;
mod reschedule;

pub use accept::AcceptAction;
pub use cancel::CancelAction;
pub use complete::CompleteAction;
pub use decline::DeclineAction;
pub use mark_ready::MarkReadyAction;
pub use reschedule::RescheduleAction;

/// LifecycleAction enum - dispatches to concrete action implementations
#[enum_dispatch(OrderActionHandler)]
#[derive(Debug, Clone)]
pub enum LifecycleAction {
    Accept(AcceptAction),
    Decline(DeclineAction),
    Reschedule(RescheduleAction),
    MarkReady(MarkReadyAction),
    Cancel(CancelAction),
    Complete(CompleteAction),
}

/// This is the ONLY place with a match on OrderAction.
impl From<&OrderAction> for LifecycleAction {
    fn from(action: &OrderAction) -> Self {
        match action {
            OrderAction::Accept => LifecycleAction::Accept(AcceptAction),
            OrderAction::Decline { reason } => LifecycleAction::Decline(DeclineAction {
                reason: reason.clone(),
            }),
            OrderAction::Reschedule { requested_time } => {
                LifecycleAction::Reschedule(RescheduleAction {
                    requested_time: *requested_time,
                })
            }
            OrderAction::MarkReady => LifecycleAction::MarkReady(MarkReadyAction),
            OrderAction::Cancel { reason } => LifecycleAction::Cancel(CancelAction {
                reason: reason.clone(),
            }),
            OrderAction::Complete => LifecycleAction::Complete(CompleteAction),
        }
    }
}

/// Trimmed reason, or `None` when blank
fn required_reason(reason: Option<&str>) -> Option<String> {
    reason
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}
