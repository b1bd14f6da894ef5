//! Complete: READY -> COMPLETED

use super::*;

/// Complete action
#[derive(Debug, Clone)]
pub struct CompleteAction;

impl OrderActionHandler for CompleteAction {
    fn execute(&self, _order: &Order, _ctx: &ActionContext) -> OrderResult<EventPayload> {
        Ok(EventPayload::OrderCompleted)
    }
}
