//! Turning a cart group into a PENDING order
//!
//! Line items are frozen from each cart item's price calculation; prices are
//! not recomputed here. Catalog lookups happen in the manager beforehand.

use super::lifecycle::{apply_event, check_serving_day};
use super::traits::{ActionContext, OrderError, OrderResult};
use crate::pricing::money::{money_eq, round_money};
use rust_decimal::Decimal;
use shared::models::PaymentMode;
use shared::order::{
    Actor, CartGroup, CartItem, EventPayload, LineItem, Order, OrderEvent, OrderPayment,
    OrderStatus, PriceCalculation,
};

/// Reason the grouped "place order" action is disabled, if any
pub fn placement_blocker(group: &CartGroup) -> Option<String> {
    if group.items.is_empty() {
        return Some("cart group is empty".to_string());
    }
    if !group.has_complete_meta {
        return Some("some items are missing concession, name or price data".to_string());
    }
    if !group.can_place_order() {
        return Some("some items are no longer available".to_string());
    }
    None
}

fn line_item(item: &CartItem, pricing: &PriceCalculation) -> LineItem {
    LineItem {
        menu_item_id: item.menu_item_id,
        name: item.name.clone(),
        variation_labels: pricing
            .variations
            .iter()
            .map(|v| format!("{}: {}", v.group_name, v.option_name))
            .collect(),
        add_on_labels: pricing.add_ons.iter().map(|a| a.name.clone()).collect(),
        unit_price: pricing.unit_price,
        quantity: item.quantity,
        line_total: pricing.total_price,
    }
}

/// Build the order and its `OrderSubmitted` event
///
/// `ctx.actor` is the customer placing the order. The returned order has
/// id 0 and version 0 until storage assigns them.
pub fn build_order(
    group: &CartGroup,
    payment_mode: &PaymentMode,
    requested_time: Option<i64>,
    ctx: &ActionContext,
) -> OrderResult<(Order, OrderEvent)> {
    let Actor::Customer(customer_id) = ctx.actor else {
        return Err(OrderError::Forbidden {
            order_id: 0,
            actor: ctx.actor,
            action: "SUBMIT_ORDER".to_string(),
        });
    };

    if let Some(reason) = placement_blocker(group) {
        return Err(OrderError::IncompleteCartGroup(reason));
    }
    let concession_id = group
        .concession_id
        .ok_or_else(|| OrderError::IncompleteCartGroup("concession is unknown".to_string()))?;

    if let Some(time) = requested_time {
        check_serving_day(time, &group.shared_serving_days, ctx.offset)?;
    }

    let mut line_items = Vec::with_capacity(group.items.len());
    for item in &group.items {
        let pricing = item.pricing.as_ref().ok_or_else(|| {
            OrderError::IncompleteCartGroup(format!("cart item {} has no price", item.id))
        })?;
        line_items.push(line_item(item, pricing));
    }
    let total_amount = round_money(line_items.iter().map(|l| l.line_total).sum::<Decimal>());
    if !money_eq(total_amount, group.total_amount) {
        return Err(OrderError::IncompleteCartGroup(format!(
            "group total {} does not match its items ({})",
            group.total_amount, total_amount
        )));
    }

    let draft = Order {
        id: 0,
        customer_id,
        concession_id,
        concession_name: group.concession_name.clone(),
        line_items,
        total_amount,
        requested_time,
        serving_days: group.shared_serving_days.clone(),
        status: OrderStatus::Pending,
        payment: OrderPayment::from(payment_mode),
        proof: None,
        reason: None,
        version: 0,
        created_at: ctx.now,
        updated_at: ctx.now,
    };

    let event = OrderEvent::new(
        0,
        0,
        ctx.actor,
        ctx.now,
        EventPayload::OrderSubmitted {
            total_amount,
            item_count: draft.item_count(),
            requested_time,
        },
    );
    let order = apply_event(&draft, &event);
    Ok((order, event))
}
