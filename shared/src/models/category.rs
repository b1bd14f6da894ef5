//! Category Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Owning concession
    pub concession_id: i64,
    pub name: String,
}

/// One item of a category, as fed to the category price check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryItemPrice {
    pub id: i64,
    pub name: String,
    pub base_price: Decimal,
}

/// Item that a category-wide adjustment would make free
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedItem {
    pub id: i64,
    pub name: String,
    pub original_price: Decimal,
    pub adjusted_price: Decimal,
}

/// Outcome of checking a category-wide price adjustment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryPriceValidationResult {
    pub has_issue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub affected_items: Vec<AffectedItem>,
}

impl CategoryPriceValidationResult {
    pub fn no_issue() -> Self {
        Self::default()
    }
}
