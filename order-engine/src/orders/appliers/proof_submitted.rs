//! ProofSubmitted event applier
//!
//! Overwrites any earlier proof; no history is kept on the order.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, Order, OrderEvent};

/// ProofSubmitted applier
pub struct ProofSubmittedApplier;

impl EventApplier for ProofSubmittedApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent) {
        if let EventPayload::ProofSubmitted { proof, .. } = &event.payload {
            order.proof = Some(proof.clone());
            order.updated_at = event.timestamp;
        }
    }
}
