//! Catalog collaborator
//!
//! The engine only reads menu items and payment modes. [`MemoryCatalog`] is the
//! in-process implementation used by embedders without their own catalog
//! backend, and by tests.

use super::validation::{CatalogError, CatalogResult, validate_catalog_write};
use crate::pricing::validate_category_adjustment;
use parking_lot::RwLock;
use shared::models::{CategoryItemPrice, CategoryPriceValidationResult, MenuItem, PaymentMode};
use std::collections::HashMap;
use std::sync::Arc;

/// Read access to the concession catalog
pub trait CatalogStore: Send + Sync {
    fn get_menu_item(&self, id: i64) -> Option<MenuItem>;

    /// Payment mode currently active for a concession
    fn get_concession_payment_mode(&self, concession_id: i64) -> Option<PaymentMode>;
}

/// In-memory catalog with write-time validation
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    /// Menu items: id -> MenuItem
    menu_items: Arc<RwLock<HashMap<i64, MenuItem>>>,
    /// Active payment mode per concession
    payment_modes: Arc<RwLock<HashMap<i64, PaymentMode>>>,
}

impl std::fmt::Debug for MemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCatalog")
            .field("menu_items_count", &self.menu_items.read().len())
            .field("payment_modes_count", &self.payment_modes.read().len())
            .finish()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a menu item after validating it against the rest of the catalog
    pub fn upsert_menu_item(&self, item: MenuItem) -> CatalogResult<()> {
        let mut items = self.menu_items.write();
        validate_catalog_write(&item, items.values().filter(|i| i.id != item.id))?;
        tracing::debug!(item_id = item.id, concession_id = item.concession_id, "Menu item saved");
        items.insert(item.id, item);
        Ok(())
    }

    /// Toggle availability without touching the rest of the item
    pub fn set_availability(&self, item_id: i64, is_available: bool) -> CatalogResult<()> {
        let mut items = self.menu_items.write();
        let item = items.get_mut(&item_id).ok_or_else(|| missing_item(item_id))?;
        item.is_available = is_available;
        Ok(())
    }

    /// Put an item in a category, dropping the category from its own variation filters
    pub fn assign_category(&self, item_id: i64, category_id: i64) -> CatalogResult<()> {
        let mut items = self.menu_items.write();
        let item = items.get_mut(&item_id).ok_or_else(|| missing_item(item_id))?;
        item.assign_category(category_id);
        Ok(())
    }

    pub fn set_payment_mode(&self, concession_id: i64, mode: PaymentMode) {
        self.payment_modes.write().insert(concession_id, mode);
    }

    /// Items of a concession that belong to `category_id`, ordered by id
    pub fn category_prices(&self, concession_id: i64, category_id: i64) -> Vec<CategoryItemPrice> {
        let items = self.menu_items.read();
        let mut prices: Vec<_> = items
            .values()
            .filter(|i| i.concession_id == concession_id && i.categories.contains(&category_id))
            .map(|i| CategoryItemPrice {
                id: i.id,
                name: i.name.clone(),
                base_price: i.base_price,
            })
            .collect();
        prices.sort_by_key(|p| p.id);
        prices
    }

    /// Check a typed category adjustment against the current prices
    pub fn check_category_adjustment(
        &self,
        concession_id: i64,
        category_id: i64,
        adjustment: Option<&str>,
    ) -> CategoryPriceValidationResult {
        validate_category_adjustment(&self.category_prices(concession_id, category_id), adjustment)
    }
}

fn missing_item(item_id: i64) -> CatalogError {
    CatalogError::InvalidMenuItem {
        item_id,
        reason: "menu item does not exist".to_string(),
    }
}

impl CatalogStore for MemoryCatalog {
    fn get_menu_item(&self, id: i64) -> Option<MenuItem> {
        self.menu_items.read().get(&id).cloned()
    }

    fn get_concession_payment_mode(&self, concession_id: i64) -> Option<PaymentMode> {
        self.payment_modes.read().get(&concession_id).cloned()
    }
}
