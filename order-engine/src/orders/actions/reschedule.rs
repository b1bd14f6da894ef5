//! Reschedule: PENDING -> PENDING with a new requested time

use super::*;
use crate::orders::lifecycle::check_serving_day;
use crate::orders::traits::OrderError;

/// Reschedule action
#[derive(Debug, Clone)]
pub struct RescheduleAction {
    /// New requested fulfillment time (Unix millis)
    pub requested_time: Option<i64>,
}

impl OrderActionHandler for RescheduleAction {
    fn execute(&self, order: &Order, ctx: &ActionContext) -> OrderResult<EventPayload> {
        let requested_time = self
            .requested_time
            .ok_or(OrderError::RequestedTimeRequired)?;
        check_serving_day(requested_time, &order.serving_days, ctx.offset)?;

        Ok(EventPayload::OrderRescheduled {
            previous_time: order.requested_time,
            requested_time,
        })
    }
}
