//! Order lifecycle state machine
//!
//! ```text
//! PENDING ──accept──▶ CONFIRMED ──markReady──▶ READY ──complete──▶ COMPLETED
//!    │ ▲                  │                      │
//!    │ └─reschedule       └──cancel──┐  ┌─cancel─┘
//!    └──decline──▶ DECLINED          ▼  ▼
//!                                 CANCELLED
//! ```
//!
//! Every action is taken by the concession that owns the order. A pair not
//! in [`target_status`] is an `InvalidTransition` and leaves the order as is.

use super::actions::LifecycleAction;
use super::appliers::EventAction;
use super::traits::{ActionContext, EventApplier, OrderActionHandler, OrderError, OrderResult};
use chrono::FixedOffset;
use shared::models::ServingDay;
use shared::order::{Actor, Order, OrderAction, OrderActionKind, OrderEvent, OrderStatus};
use shared::util::serving_day_at;
use std::collections::BTreeSet;

/// Status reached by taking `action` from `from`, or `None` if the table has no such row
pub fn target_status(from: OrderStatus, action: OrderActionKind) -> Option<OrderStatus> {
    use OrderActionKind as A;
    use OrderStatus as S;

    match (from, action) {
        (S::Pending, A::Accept) => Some(S::Confirmed),
        (S::Pending, A::Decline) => Some(S::Declined),
        (S::Pending, A::Reschedule) => Some(S::Pending),
        (S::Pending, A::MarkReady | A::Cancel | A::Complete) => None,

        (S::Confirmed, A::MarkReady) => Some(S::Ready),
        (S::Confirmed, A::Cancel) => Some(S::Cancelled),
        (S::Confirmed, A::Accept | A::Decline | A::Reschedule | A::Complete) => None,

        (S::Ready, A::Complete) => Some(S::Completed),
        (S::Ready, A::Cancel) => Some(S::Cancelled),
        (S::Ready, A::Accept | A::Decline | A::Reschedule | A::MarkReady) => None,

        (S::Completed | S::Declined | S::Cancelled, _) => None,
    }
}

/// Only the owning concession drives status changes
pub fn authorize(order: &Order, actor: Actor, action: OrderActionKind) -> OrderResult<()> {
    match actor {
        Actor::Concession(id) if id == order.concession_id => Ok(()),
        _ => Err(OrderError::Forbidden {
            order_id: order.id,
            actor,
            action: action.to_string(),
        }),
    }
}

/// A requested time must land on one of `days` in the business time zone
pub fn check_serving_day(
    requested_time: i64,
    days: &BTreeSet<ServingDay>,
    offset: FixedOffset,
) -> OrderResult<()> {
    let day = serving_day_at(requested_time, offset)
        .ok_or(OrderError::InvalidRequestedTime(requested_time))?;
    if days.contains(&day) {
        Ok(())
    } else {
        Err(OrderError::ServingDayMismatch { day })
    }
}

/// Validate `action` against `order` and describe the change as an event
///
/// The event carries sequence 0; storage stamps the real sequence on save.
pub fn decide(order: &Order, action: &OrderAction, ctx: &ActionContext) -> OrderResult<OrderEvent> {
    let kind = action.kind();
    authorize(order, ctx.actor, kind)?;

    if target_status(order.status, kind).is_none() {
        tracing::warn!(
            order_id = order.id,
            status = %order.status,
            action = %kind,
            "Rejected transition"
        );
        return Err(OrderError::InvalidTransition {
            order_id: order.id,
            from: order.status,
            action: kind,
        });
    }

    let handler: LifecycleAction = action.into();
    let payload = handler.execute(order, ctx)?;
    Ok(OrderEvent::new(0, order.id, ctx.actor, ctx.now, payload))
}

/// Apply a recorded event to a copy of `order`
pub fn apply_event(order: &Order, event: &OrderEvent) -> Order {
    let mut next = order.clone();
    let applier: EventAction = event.into();
    applier.apply(&mut next, event);
    next
}

/// Pure transition: the updated order plus the event that explains it
///
/// `order` itself is never touched, so a failed call leaves nothing to undo.
pub fn apply_transition(
    order: &Order,
    action: &OrderAction,
    ctx: &ActionContext,
) -> OrderResult<(Order, OrderEvent)> {
    let event = decide(order, action, ctx)?;
    let next = apply_event(order, &event);
    tracing::info!(
        order_id = order.id,
        from = %order.status,
        to = %next.status,
        action = %action.kind(),
        actor = %ctx.actor,
        "Order transitioned"
    );
    Ok((next, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::ProofMode;
    use shared::order::{
        EventPayload, OrderEventType, OrderPayment, PaymentProof, ProofRequirement, ProofSubmission,
    };

    const CONCESSION: i64 = 7;
    const NOW: i64 = 1_704_151_800_000;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn ctx() -> ActionContext {
        ActionContext::new(Actor::Concession(CONCESSION), NOW, utc())
    }

    fn order(status: OrderStatus, proof: ProofRequirement) -> Order {
        Order {
            id: 1,
            customer_id: 42,
            concession_id: CONCESSION,
            concession_name: "Grill".to_string(),
            line_items: vec![],
            total_amount: Decimal::from(180),
            requested_time: None,
            serving_days: ServingDay::ALL.into_iter().collect(),
            status,
            payment: OrderPayment {
                payment_mode_id: 1,
                label: "GCash".to_string(),
                details: String::new(),
                proof_requirement: proof,
            },
            proof: None,
            reason: None,
            version: 1,
            created_at: NOW - 1000,
            updated_at: NOW - 1000,
        }
    }

    fn pending() -> Order {
        order(OrderStatus::Pending, ProofRequirement::NotRequired)
    }

    fn every_action() -> Vec<OrderAction> {
        vec![
            OrderAction::Accept,
            OrderAction::Decline {
                reason: Some("Sold out".to_string()),
            },
            OrderAction::Reschedule {
                requested_time: Some(NOW + 3_600_000),
            },
            OrderAction::MarkReady,
            OrderAction::Cancel {
                reason: Some("Closed".to_string()),
            },
            OrderAction::Complete,
        ]
    }

    #[test]
    fn test_table_matches_allowed_actions() {
        for status in OrderStatus::ALL {
            for kind in OrderActionKind::ALL {
                assert_eq!(
                    target_status(status, kind).is_some(),
                    status.allowed_actions().contains(&kind),
                    "{status} / {kind}"
                );
            }
        }
    }

    #[test]
    fn test_happy_path() {
        let (confirmed, event) = apply_transition(&pending(), &OrderAction::Accept, &ctx()).unwrap();
        assert_eq!(confirmed.status, OrderStatus::Confirmed);
        assert_eq!(event.event_type, OrderEventType::OrderAccepted);
        assert_eq!(confirmed.updated_at, NOW);

        let (ready, _) = apply_transition(&confirmed, &OrderAction::MarkReady, &ctx()).unwrap();
        assert_eq!(ready.status, OrderStatus::Ready);

        let (done, _) = apply_transition(&ready, &OrderAction::Complete, &ctx()).unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert!(done.status.is_terminal());
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for status in [OrderStatus::Completed, OrderStatus::Declined, OrderStatus::Cancelled] {
            let order = order(status, ProofRequirement::NotRequired);
            for action in every_action() {
                let err = apply_transition(&order, &action, &ctx()).unwrap_err();
                assert!(
                    matches!(err, OrderError::InvalidTransition { from, .. } if from == status),
                    "{status} / {:?} gave {err:?}",
                    action
                );
            }
        }
    }

    #[test]
    fn test_unlisted_pairs_rejected() {
        let err = apply_transition(&pending(), &OrderAction::Complete, &ctx()).unwrap_err();
        assert_eq!(err.code(), shared::ErrorCode::InvalidTransition);

        let confirmed = order(OrderStatus::Confirmed, ProofRequirement::NotRequired);
        assert!(apply_transition(&confirmed, &OrderAction::Accept, &ctx()).is_err());
    }

    #[test]
    fn test_decline_requires_reason() {
        let order = pending();
        for reason in [None, Some("   ".to_string())] {
            let err = apply_transition(&order, &OrderAction::Decline { reason }, &ctx()).unwrap_err();
            assert_eq!(err, OrderError::ReasonRequired(OrderActionKind::Decline));
        }
        assert_eq!(order.status, OrderStatus::Pending);

        let (declined, event) = apply_transition(
            &order,
            &OrderAction::Decline {
                reason: Some("  Out of rice ".to_string()),
            },
            &ctx(),
        )
        .unwrap();
        assert_eq!(declined.status, OrderStatus::Declined);
        assert_eq!(declined.reason.as_deref(), Some("Out of rice"));
        assert_eq!(
            event.payload,
            EventPayload::OrderDeclined {
                reason: "Out of rice".to_string()
            }
        );
    }

    #[test]
    fn test_cancel_records_origin_and_reason() {
        let ready = order(OrderStatus::Ready, ProofRequirement::NotRequired);
        assert_eq!(
            apply_transition(&ready, &OrderAction::Cancel { reason: None }, &ctx()).unwrap_err(),
            OrderError::ReasonRequired(OrderActionKind::Cancel)
        );

        let (cancelled, event) = apply_transition(
            &ready,
            &OrderAction::Cancel {
                reason: Some("Customer no-show".to_string()),
            },
            &ctx(),
        )
        .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(matches!(
            event.payload,
            EventPayload::OrderCancelled {
                from_status: OrderStatus::Ready,
                ..
            }
        ));
    }

    #[test]
    fn test_reschedule_stays_pending() {
        let order = pending();
        assert_eq!(
            apply_transition(&order, &OrderAction::Reschedule { requested_time: None }, &ctx())
                .unwrap_err(),
            OrderError::RequestedTimeRequired
        );

        let later = NOW + 7_200_000;
        let (rescheduled, event) = apply_transition(
            &order,
            &OrderAction::Reschedule {
                requested_time: Some(later),
            },
            &ctx(),
        )
        .unwrap();
        assert_eq!(rescheduled.status, OrderStatus::Pending);
        assert_eq!(rescheduled.requested_time, Some(later));
        assert_eq!(
            event.payload,
            EventPayload::OrderRescheduled {
                previous_time: None,
                requested_time: later
            }
        );
    }

    #[test]
    fn test_reschedule_checks_serving_days() {
        let mut order = pending();
        // NOW is a Monday in UTC
        order.serving_days = [ServingDay::Wednesday].into_iter().collect();
        let err = apply_transition(
            &order,
            &OrderAction::Reschedule {
                requested_time: Some(NOW),
            },
            &ctx(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            OrderError::ServingDayMismatch {
                day: ServingDay::Monday
            }
        );
    }

    #[test]
    fn test_mark_ready_gated_by_proof() {
        let mut confirmed = order(OrderStatus::Confirmed, ProofRequirement::Required(ProofMode::Text));
        let err = apply_transition(&confirmed, &OrderAction::MarkReady, &ctx()).unwrap_err();
        assert_eq!(err, OrderError::ProofRequired(1));

        confirmed.proof = Some(PaymentProof {
            value: ProofSubmission::Text {
                reference: "REF-1".to_string(),
            },
            submitted_at: NOW - 10,
        });
        let (ready, _) = apply_transition(&confirmed, &OrderAction::MarkReady, &ctx()).unwrap();
        assert_eq!(ready.status, OrderStatus::Ready);
    }

    #[test]
    fn test_only_owning_concession_may_act() {
        let order = pending();
        for actor in [Actor::Customer(42), Actor::Concession(CONCESSION + 1)] {
            let ctx = ActionContext::new(actor, NOW, utc());
            let err = apply_transition(&order, &OrderAction::Accept, &ctx).unwrap_err();
            assert!(matches!(err, OrderError::Forbidden { .. }));
        }
    }

    #[test]
    fn test_check_serving_day_uses_offset() {
        let tuesday_only: BTreeSet<_> = [ServingDay::Tuesday].into_iter().collect();
        assert!(check_serving_day(NOW, &tuesday_only, utc()).is_err());
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        assert!(check_serving_day(NOW, &tuesday_only, manila).is_ok());
        assert!(check_serving_day(NOW, &BTreeSet::new(), utc()).is_err());
    }
}
