//! Payment proof sub-protocol
//!
//! The requirement is frozen on the order at submission. While the order is
//! PENDING or CONFIRMED its customer may hand in proof in the required mode;
//! a later submission overwrites the earlier one. `markReady` is refused
//! while a required proof is missing.

use super::lifecycle::apply_event;
use super::traits::{ActionContext, OrderError, OrderResult};
use shared::models::ProofMode;
use shared::order::{
    Actor, EventPayload, Order, OrderEvent, OrderStatus, PaymentProof, ProofRequirement,
    ProofSubmission,
};

/// Check a submission against the order's requirement, returning it normalized
pub fn validate_submission(
    requirement: ProofRequirement,
    submission: ProofSubmission,
) -> OrderResult<ProofSubmission> {
    let ProofRequirement::Required(mode) = requirement else {
        return Err(OrderError::InvalidProof(
            "payment method does not take proof".to_string(),
        ));
    };

    match (mode, submission) {
        (ProofMode::Text, ProofSubmission::Text { reference }) => {
            let reference = reference.trim();
            if reference.is_empty() {
                return Err(OrderError::InvalidProof(
                    "transaction reference is empty".to_string(),
                ));
            }
            Ok(ProofSubmission::Text {
                reference: reference.to_string(),
            })
        }
        (ProofMode::Screenshot, ProofSubmission::Screenshot { image_ref }) => {
            if image_ref.trim().is_empty() {
                return Err(OrderError::InvalidProof("image reference is empty".to_string()));
            }
            Ok(ProofSubmission::Screenshot { image_ref })
        }
        (ProofMode::Text, ProofSubmission::Screenshot { .. }) => Err(OrderError::InvalidProof(
            "a transaction reference is required, not a screenshot".to_string(),
        )),
        (ProofMode::Screenshot, ProofSubmission::Text { .. }) => Err(OrderError::InvalidProof(
            "a screenshot is required, not a text reference".to_string(),
        )),
    }
}

/// Gate for `CONFIRMED -> READY`
pub fn ensure_proof(order: &Order) -> OrderResult<()> {
    if order.proof_satisfied() {
        Ok(())
    } else {
        tracing::warn!(order_id = order.id, "Mark ready blocked: payment proof missing");
        Err(OrderError::ProofRequired(order.id))
    }
}

/// Record proof from the order's customer
///
/// `ctx.actor` must be `Actor::Customer` owning the order.
pub fn record_proof(
    order: &Order,
    submission: ProofSubmission,
    ctx: &ActionContext,
) -> OrderResult<(Order, OrderEvent)> {
    match ctx.actor {
        Actor::Customer(id) if id == order.customer_id => {}
        actor => {
            return Err(OrderError::Forbidden {
                order_id: order.id,
                actor,
                action: "SUBMIT_PROOF".to_string(),
            });
        }
    }

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed) {
        return Err(OrderError::ProofClosed {
            order_id: order.id,
            status: order.status,
        });
    }

    let value = validate_submission(order.payment.proof_requirement, submission)?;
    let payload = EventPayload::ProofSubmitted {
        proof: PaymentProof {
            value,
            submitted_at: ctx.now,
        },
        replaced: order.proof.is_some(),
    };
    let event = OrderEvent::new(0, order.id, ctx.actor, ctx.now, payload);
    let next = apply_event(order, &event);

    tracing::info!(
        order_id = order.id,
        customer_id = order.customer_id,
        replaced = order.proof.is_some(),
        "Payment proof recorded"
    );
    Ok((next, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use rust_decimal::Decimal;
    use shared::order::OrderPayment;

    const NOW: i64 = 1_704_151_800_000;

    fn order(status: OrderStatus, requirement: ProofRequirement) -> Order {
        Order {
            id: 3,
            customer_id: 42,
            concession_id: 7,
            concession_name: "Grill".to_string(),
            line_items: vec![],
            total_amount: Decimal::from(50),
            requested_time: None,
            serving_days: Default::default(),
            status,
            payment: OrderPayment {
                payment_mode_id: 1,
                label: "GCash".to_string(),
                details: "0917 000 0000".to_string(),
                proof_requirement: requirement,
            },
            proof: None,
            reason: None,
            version: 2,
            created_at: NOW - 5000,
            updated_at: NOW - 5000,
        }
    }

    fn customer_ctx(now: i64) -> ActionContext {
        ActionContext::new(Actor::Customer(42), now, FixedOffset::east_opt(0).unwrap())
    }

    fn text(reference: &str) -> ProofSubmission {
        ProofSubmission::Text {
            reference: reference.to_string(),
        }
    }

    #[test]
    fn test_text_proof_trimmed() {
        let requirement = ProofRequirement::Required(ProofMode::Text);
        assert_eq!(
            validate_submission(requirement, text("  TX-991 ")).unwrap(),
            text("TX-991")
        );
        assert!(validate_submission(requirement, text("   ")).is_err());
    }

    #[test]
    fn test_mode_mismatch_rejected() {
        let screenshot = ProofSubmission::Screenshot {
            image_ref: "uploads/abc.png".to_string(),
        };
        assert!(validate_submission(ProofRequirement::Required(ProofMode::Text), screenshot.clone()).is_err());
        assert!(validate_submission(ProofRequirement::Required(ProofMode::Screenshot), screenshot).is_ok());
        assert!(validate_submission(ProofRequirement::Required(ProofMode::Screenshot), text("TX")).is_err());
        assert!(validate_submission(ProofRequirement::NotRequired, text("TX")).is_err());
    }

    #[test]
    fn test_record_and_overwrite() {
        let confirmed = order(OrderStatus::Confirmed, ProofRequirement::Required(ProofMode::Text));
        assert!(ensure_proof(&confirmed).is_err());

        let (first, event) = record_proof(&confirmed, text("TX-1"), &customer_ctx(NOW)).unwrap();
        assert!(matches!(event.payload, EventPayload::ProofSubmitted { replaced: false, .. }));
        assert!(ensure_proof(&first).is_ok());
        assert_eq!(first.status, OrderStatus::Confirmed);

        let (second, event) = record_proof(&first, text("TX-2"), &customer_ctx(NOW + 60_000)).unwrap();
        assert!(matches!(event.payload, EventPayload::ProofSubmitted { replaced: true, .. }));
        let proof = second.proof.unwrap();
        assert_eq!(proof.value, text("TX-2"));
        assert_eq!(proof.submitted_at, NOW + 60_000);
    }

    #[test]
    fn test_only_owner_during_open_statuses() {
        let confirmed = order(OrderStatus::Confirmed, ProofRequirement::Required(ProofMode::Text));
        let stranger = ActionContext::new(Actor::Customer(9), NOW, FixedOffset::east_opt(0).unwrap());
        assert!(matches!(
            record_proof(&confirmed, text("TX"), &stranger),
            Err(OrderError::Forbidden { .. })
        ));

        let concession = ActionContext::new(Actor::Concession(7), NOW, FixedOffset::east_opt(0).unwrap());
        assert!(record_proof(&confirmed, text("TX"), &concession).is_err());

        let ready = order(OrderStatus::Ready, ProofRequirement::Required(ProofMode::Text));
        assert_eq!(
            record_proof(&ready, text("TX"), &customer_ctx(NOW)).unwrap_err(),
            OrderError::ProofClosed {
                order_id: 3,
                status: OrderStatus::Ready
            }
        );
    }

    #[test]
    fn test_no_proof_needed_is_always_satisfied() {
        let confirmed = order(OrderStatus::Confirmed, ProofRequirement::NotRequired);
        assert!(ensure_proof(&confirmed).is_ok());
    }
}
