//! Cart grouping
//!
//! Splits a customer's flat cart into one group per concession. Totals come
//! from each item's own price calculation and are never recomputed here.

use crate::pricing::money::MAX_QUANTITY;
use rust_decimal::Decimal;
use shared::models::ServingDay;
use shared::order::{CartGroup, CartItem};
use std::collections::BTreeSet;

/// Name shown for items that arrived without concession data
const UNKNOWN_CONCESSION: &str = "Unknown concession";

/// Group cart items by concession, keeping the order in which concessions first appear
pub fn build_cart_groups(items: &[CartItem]) -> Vec<CartGroup> {
    let mut keys: Vec<Option<i64>> = Vec::new();
    let mut members: Vec<Vec<CartItem>> = Vec::new();

    for item in items {
        match keys.iter().position(|k| *k == item.concession_id) {
            Some(idx) => members[idx].push(item.clone()),
            None => {
                keys.push(item.concession_id);
                members.push(vec![item.clone()]);
            }
        }
    }

    let groups: Vec<CartGroup> = keys
        .into_iter()
        .zip(members)
        .map(|(concession_id, items)| summarize(concession_id, items))
        .collect();

    tracing::debug!(
        item_count = items.len(),
        group_count = groups.len(),
        "Built cart groups"
    );
    groups
}

fn summarize(concession_id: Option<i64>, items: Vec<CartItem>) -> CartGroup {
    let concession_name = items
        .iter()
        .find_map(|i| i.concession_name.as_deref().filter(|n| !n.trim().is_empty()))
        .unwrap_or(UNKNOWN_CONCESSION)
        .to_string();

    let quantity_sum = items
        .iter()
        .try_fold(0u32, |acc, i| acc.checked_add(i.quantity));
    let amount_sum = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.total_price()));
    let quantities_in_range = items.iter().all(|i| i.quantity <= MAX_QUANTITY);

    // Out-of-range totals saturate and mark the group unplaceable
    let total_quantity = quantity_sum.unwrap_or(u32::MAX);
    let total_amount = amount_sum.unwrap_or(Decimal::MAX);
    let shared_serving_days = shared_days(&items);
    let has_complete_meta = quantity_sum.is_some()
        && amount_sum.is_some()
        && quantities_in_range
        && items.iter().all(CartItem::has_complete_meta);

    if !has_complete_meta {
        tracing::debug!(concession_id = ?concession_id, "Cart group has incomplete item data");
    }

    CartGroup {
        concession_id,
        concession_name,
        items,
        total_quantity,
        total_amount,
        shared_serving_days,
        has_complete_meta,
    }
}

/// Intersection of every member's serving days; one empty member empties the result
fn shared_days(items: &[CartItem]) -> BTreeSet<ServingDay> {
    let mut iter = items.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    iter.fold(first.serving_days.clone(), |acc, item| {
        acc.intersection(&item.serving_days).copied().collect()
    })
}

/// Flatten groups back into cart order by group
pub fn flatten_groups(groups: &[CartGroup]) -> Vec<CartItem> {
    groups.iter().flat_map(|g| g.items.iter().cloned()).collect()
}
