//! Cancel: CONFIRMED or READY -> CANCELLED, reason required

use super::*;
use crate::orders::traits::OrderError;
use shared::order::OrderActionKind;

/// Cancel action
#[derive(Debug, Clone)]
pub struct CancelAction {
    pub reason: Option<String>,
}

impl OrderActionHandler for CancelAction {
    fn execute(&self, order: &Order, _ctx: &ActionContext) -> OrderResult<EventPayload> {
        let reason = required_reason(self.reason.as_deref())
            .ok_or(OrderError::ReasonRequired(OrderActionKind::Cancel))?;
        Ok(EventPayload::OrderCancelled {
            from_status: order.status,
            reason,
        })
    }
}
