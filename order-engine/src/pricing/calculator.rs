//! Item Price Calculator
//!
//! Prices one cart line from a menu item, the customer's selection and a quantity:
//!
//! ```text
//! unit  = max(0, base_price + Σ chosen variation adjustments + Σ selected add-ons)
//! total = unit × quantity
//! ```
//!
//! Groups missing from the selection contribute nothing; there is no implicit
//! default option. The calculation is pure and deterministic.

use super::money::{MAX_QUANTITY, floor_at_zero, round_money};
use rust_decimal::Decimal;
use shared::models::MenuItem;
use shared::order::{AppliedAddOn, AppliedVariation, PriceCalculation, Selection};
use thiserror::Error;
use tracing::debug;

/// What is wrong with a selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionIssue {
    #[error("variation group {0} does not belong to the item")]
    UnknownGroup(i64),

    #[error("option {option_id} does not belong to variation group {group_id}")]
    UnknownOption { group_id: i64, option_id: i64 },

    #[error("variation group {group_id} allows at most {limit} option(s), got {chosen}")]
    TooManyOptions {
        group_id: i64,
        limit: usize,
        chosen: usize,
    },

    #[error("add-on {0} does not belong to the item")]
    UnknownAddOn(i64),

    #[error("quantity must be between 1 and 9999, got {0}")]
    InvalidQuantity(u32),

    #[error("price is out of range")]
    PriceOutOfRange,
}

/// Pricing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Invalid selection for menu item {item_id}: {issue}")]
    InvalidSelection { item_id: i64, issue: SelectionIssue },
}

impl PricingError {
    fn invalid(item_id: i64, issue: SelectionIssue) -> Self {
        PricingError::InvalidSelection { item_id, issue }
    }
}

pub type PricingResult<T> = Result<T, PricingError>;

/// Check the selection against the item without computing anything
pub fn validate_selection(
    item: &MenuItem,
    selection: &Selection,
    quantity: u32,
) -> PricingResult<()> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(PricingError::invalid(
            item.id,
            SelectionIssue::InvalidQuantity(quantity),
        ));
    }

    for (group_id, chosen) in &selection.variations {
        let group = item
            .variation_group(*group_id)
            .ok_or_else(|| PricingError::invalid(item.id, SelectionIssue::UnknownGroup(*group_id)))?;

        if let Some(limit) = group.selection_limit()
            && chosen.len() > limit
        {
            return Err(PricingError::invalid(
                item.id,
                SelectionIssue::TooManyOptions {
                    group_id: group.id,
                    limit,
                    chosen: chosen.len(),
                },
            ));
        }

        if let Some(unknown) = chosen.iter().find(|id| group.option(**id).is_none()) {
            return Err(PricingError::invalid(
                item.id,
                SelectionIssue::UnknownOption {
                    group_id: group.id,
                    option_id: *unknown,
                },
            ));
        }
    }

    if let Some(unknown) = selection
        .selected_add_ons()
        .find(|id| item.add_on(*id).is_none())
    {
        return Err(PricingError::invalid(
            item.id,
            SelectionIssue::UnknownAddOn(unknown),
        ));
    }

    Ok(())
}

fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |acc, v| acc?.checked_add(v))
}

/// Calculate the itemized price of `quantity` units of `item`
pub fn calculate_price(
    item: &MenuItem,
    selection: &Selection,
    quantity: u32,
) -> PricingResult<PriceCalculation> {
    validate_selection(item, selection, quantity)?;

    // Walk groups and options in the item's own order so the breakdown is stable
    let mut variations = Vec::new();
    for group in &item.variation_groups {
        let Some(chosen) = selection.variations.get(&group.id) else {
            continue;
        };
        for option in group.options.iter().filter(|o| chosen.contains(&o.id)) {
            variations.push(AppliedVariation {
                group_id: group.id,
                group_name: group.name.clone(),
                option_id: option.id,
                option_name: option.name.clone(),
                price_adjustment: option.price_adjustment,
            });
        }
    }

    let add_ons: Vec<AppliedAddOn> = item
        .add_ons
        .iter()
        .filter(|a| selection.add_ons.get(&a.id).copied().unwrap_or(false))
        .map(|a| AppliedAddOn {
            add_on_id: a.id,
            name: a.name.clone(),
            price: a.price,
        })
        .collect();

    let out_of_range = || PricingError::invalid(item.id, SelectionIssue::PriceOutOfRange);

    let variation_total = checked_sum(variations.iter().map(|v| v.price_adjustment))
        .ok_or_else(out_of_range)?;
    let add_on_total = checked_sum(add_ons.iter().map(|a| a.price)).ok_or_else(out_of_range)?;

    let raw_unit = item
        .base_price
        .checked_add(variation_total)
        .and_then(|v| v.checked_add(add_on_total))
        .ok_or_else(out_of_range)?;
    let unit_price = round_money(floor_at_zero(raw_unit));
    let total_price = unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round_money)
        .ok_or_else(out_of_range)?;

    debug!(
        item_id = item.id,
        base_price = %item.base_price,
        variation_total = %variation_total,
        add_on_total = %add_on_total,
        unit_price = %unit_price,
        quantity,
        total_price = %total_price,
        "Calculated item price"
    );

    Ok(PriceCalculation {
        menu_item_id: item.id,
        base_price: item.base_price,
        variation_total,
        add_on_total,
        unit_price,
        quantity,
        total_price,
        variations,
        add_ons,
    })
}
