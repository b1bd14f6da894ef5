//! Write-time checks for menu items

use super::graph::VariationGraph;
use crate::pricing::money::{MAX_PRICE, within_price_bound};
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{MenuItem, OptionTarget};
use std::collections::BTreeSet;
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Invalid menu item {item_id}: {reason}")]
    InvalidMenuItem { item_id: i64, reason: String },

    #[error("Category {category_id} is assigned to item {item_id} and also used as a variation filter")]
    CategoryFilterConflict { item_id: i64, category_id: i64 },

    #[error("Variation options form a cycle: {path:?}")]
    VariationCycle { path: Vec<i64> },
}

impl CatalogError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CatalogError::InvalidMenuItem { .. } | CatalogError::CategoryFilterConflict { .. } => {
                ErrorCode::InvalidMenuItem
            }
            CatalogError::VariationCycle { .. } => ErrorCode::VariationCycle,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

fn invalid(item: &MenuItem, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidMenuItem {
        item_id: item.id,
        reason: reason.into(),
    }
}

/// Validate a single item on its own
pub fn validate_menu_item(item: &MenuItem) -> CatalogResult<()> {
    if item.id <= 0 || item.concession_id <= 0 {
        return Err(invalid(item, "identifiers must be positive"));
    }
    if item.name.trim().is_empty() {
        return Err(invalid(item, "name is required"));
    }
    if item.base_price < Decimal::ZERO {
        return Err(invalid(item, format!("base price {} is negative", item.base_price)));
    }
    if !within_price_bound(item.base_price) {
        return Err(invalid(
            item,
            format!("base price {} exceeds {}", item.base_price, MAX_PRICE),
        ));
    }

    let mut group_ids = BTreeSet::new();
    for group in &item.variation_groups {
        if !group_ids.insert(group.id) {
            return Err(invalid(item, format!("duplicate variation group {}", group.id)));
        }
        if group.selection_mode.is_multi() && group.max_selections == Some(0) {
            return Err(invalid(
                item,
                format!("variation group {} allows zero selections", group.id),
            ));
        }

        let mut option_ids = BTreeSet::new();
        for option in &group.options {
            if !within_price_bound(option.price_adjustment) {
                return Err(invalid(
                    item,
                    format!(
                        "option {} adjustment {} exceeds {}",
                        option.id, option.price_adjustment, MAX_PRICE
                    ),
                ));
            }
            if !option_ids.insert(option.id) {
                return Err(invalid(
                    item,
                    format!("duplicate option {} in group {}", option.id, group.id),
                ));
            }
            match (group.selection_mode.uses_category_filter(), option.target) {
                (true, OptionTarget::Category(category_id)) => {
                    if item.categories.contains(&category_id) {
                        return Err(CatalogError::CategoryFilterConflict {
                            item_id: item.id,
                            category_id,
                        });
                    }
                }
                (false, OptionTarget::MenuItem(target_id)) => {
                    if target_id == item.id {
                        return Err(CatalogError::VariationCycle {
                            path: vec![item.id, item.id],
                        });
                    }
                }
                (true, OptionTarget::MenuItem(_)) => {
                    return Err(invalid(
                        item,
                        format!("group {} filters by category but option {} names an item", group.id, option.id),
                    ));
                }
                (false, OptionTarget::Category(_)) => {
                    return Err(invalid(
                        item,
                        format!("group {} picks items but option {} names a category", group.id, option.id),
                    ));
                }
            }
        }
    }

    let mut add_on_ids = BTreeSet::new();
    for add_on in &item.add_ons {
        if !add_on_ids.insert(add_on.id) {
            return Err(invalid(item, format!("duplicate add-on {}", add_on.id)));
        }
        if add_on.price < Decimal::ZERO {
            return Err(invalid(
                item,
                format!("add-on {} has negative price {}", add_on.id, add_on.price),
            ));
        }
        if !within_price_bound(add_on.price) {
            return Err(invalid(
                item,
                format!("add-on {} price {} exceeds {}", add_on.id, add_on.price, MAX_PRICE),
            ));
        }
    }

    Ok(())
}

/// Validate an item about to be saved next to the existing catalog.
///
/// `existing` may contain a previous version of `item`; its edges are replaced.
pub fn validate_catalog_write<'a>(
    item: &MenuItem,
    existing: impl IntoIterator<Item = &'a MenuItem>,
) -> CatalogResult<()> {
    validate_menu_item(item)?;

    let mut graph = VariationGraph::from_items(existing);
    graph.upsert(item);
    if let Some(path) = graph.find_cycle_from(item.id) {
        tracing::warn!(item_id = item.id, path = ?path, "Rejected menu item: variation cycle");
        return Err(CatalogError::VariationCycle { path });
    }
    Ok(())
}
