//! MarkReady: CONFIRMED -> READY, gated by payment proof

use super::*;
use crate::orders::proof::ensure_proof;

/// MarkReady action
#[derive(Debug, Clone)]
pub struct MarkReadyAction;

impl OrderActionHandler for MarkReadyAction {
    fn execute(&self, order: &Order, _ctx: &ActionContext) -> OrderResult<EventPayload> {
        ensure_proof(order)?;
        Ok(EventPayload::OrderMarkedReady)
    }
}
