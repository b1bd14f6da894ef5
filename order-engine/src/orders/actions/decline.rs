//! Decline: PENDING -> DECLINED, reason required

use super::*;
use crate::orders::traits::OrderError;
use shared::order::OrderActionKind;

/// Decline action
#[derive(Debug, Clone)]
pub struct DeclineAction {
    pub reason: Option<String>,
}

impl OrderActionHandler for DeclineAction {
    fn execute(&self, _order: &Order, _ctx: &ActionContext) -> OrderResult<EventPayload> {
        let reason = required_reason(self.reason.as_deref())
            .ok_or(OrderError::ReasonRequired(OrderActionKind::Decline))?;
        Ok(EventPayload::OrderDeclined { reason })
    }
}
