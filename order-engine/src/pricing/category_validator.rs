//! Category Price Impact Check
//!
//! Before a concession applies one price adjustment to a whole category,
//! report every item that is priced today but would become free afterwards.
//! Only negative adjustments can do that; items already at zero are never
//! reported. Blocking or merely warning is left to the caller.

use super::money::{floor_at_zero, format_money};
use rust_decimal::Decimal;
use shared::models::{AffectedItem, CategoryItemPrice, CategoryPriceValidationResult};
use std::str::FromStr;

/// Parse the adjustment as typed by the concession (e.g. "-50", "12.5")
pub fn parse_adjustment(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

/// Check a raw adjustment; absent or unparseable input reports no issue
pub fn validate_category_adjustment(
    items: &[CategoryItemPrice],
    adjustment: Option<&str>,
) -> CategoryPriceValidationResult {
    validate_category_adjustment_decimal(items, adjustment.and_then(parse_adjustment))
}

/// Check an already parsed adjustment
pub fn validate_category_adjustment_decimal(
    items: &[CategoryItemPrice],
    adjustment: Option<Decimal>,
) -> CategoryPriceValidationResult {
    let Some(adjustment) = adjustment.filter(|a| a.is_sign_negative() && !a.is_zero()) else {
        return CategoryPriceValidationResult::no_issue();
    };

    let affected_items: Vec<AffectedItem> = items
        .iter()
        .filter_map(|item| {
            let adjusted = floor_at_zero(item.base_price + adjustment);
            (item.base_price > Decimal::ZERO && adjusted.is_zero()).then(|| AffectedItem {
                id: item.id,
                name: item.name.clone(),
                original_price: item.base_price,
                adjusted_price: adjusted,
            })
        })
        .collect();

    if affected_items.is_empty() {
        return CategoryPriceValidationResult::no_issue();
    }

    tracing::debug!(
        adjustment = %adjustment,
        affected = affected_items.len(),
        "Category adjustment would make items free"
    );

    CategoryPriceValidationResult {
        has_issue: true,
        message: Some(warning_message(adjustment, &affected_items)),
        affected_items,
    }
}

fn warning_message(adjustment: Decimal, affected: &[AffectedItem]) -> String {
    let names = affected
        .iter()
        .map(|a| format!("{} ({})", a.name, format_money(a.original_price)))
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if affected.len() == 1 { "item" } else { "items" };
    format!(
        "Adjusting by {} will make {} {} free: {}",
        format_money(adjustment),
        affected.len(),
        noun,
        names
    )
}
