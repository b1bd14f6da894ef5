//! Accept: PENDING -> CONFIRMED

use super::*;

/// Accept action
#[derive(Debug, Clone)]
pub struct AcceptAction;

impl OrderActionHandler for AcceptAction {
    fn execute(&self, _order: &Order, _ctx: &ActionContext) -> OrderResult<EventPayload> {
        Ok(EventPayload::OrderAccepted)
    }
}
