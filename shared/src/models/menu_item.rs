//! Menu Item Model
//!
//! A concession's sellable item together with its variation groups and add-ons.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Weekday key an item is served on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl ServingDay {
    pub const ALL: [ServingDay; 7] = [
        ServingDay::Monday,
        ServingDay::Tuesday,
        ServingDay::Wednesday,
        ServingDay::Thursday,
        ServingDay::Friday,
        ServingDay::Saturday,
        ServingDay::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServingDay::Monday => "monday",
            ServingDay::Tuesday => "tuesday",
            ServingDay::Wednesday => "wednesday",
            ServingDay::Thursday => "thursday",
            ServingDay::Friday => "friday",
            ServingDay::Saturday => "saturday",
            ServingDay::Sunday => "sunday",
        }
    }
}

impl From<chrono::Weekday> for ServingDay {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => ServingDay::Monday,
            chrono::Weekday::Tue => ServingDay::Tuesday,
            chrono::Weekday::Wed => ServingDay::Wednesday,
            chrono::Weekday::Thu => ServingDay::Thursday,
            chrono::Weekday::Fri => ServingDay::Friday,
            chrono::Weekday::Sat => ServingDay::Saturday,
            chrono::Weekday::Sun => ServingDay::Sunday,
        }
    }
}

impl std::fmt::Display for ServingDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How options of a variation group are picked and what they point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    /// Pick one existing menu item
    SingleItem,
    /// Pick several existing menu items
    MultiItem,
    /// Pick one item out of a category
    SingleCategory,
    /// Pick several items out of a category
    MultiCategory,
}

impl SelectionMode {
    pub fn is_multi(&self) -> bool {
        matches!(self, SelectionMode::MultiItem | SelectionMode::MultiCategory)
    }

    /// Whether options of this mode reference categories rather than items
    pub fn uses_category_filter(&self) -> bool {
        matches!(
            self,
            SelectionMode::SingleCategory | SelectionMode::MultiCategory
        )
    }
}

/// What a variation option refers to (exactly one of the two)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OptionTarget {
    MenuItem(i64),
    Category(i64),
}

/// Variation option (embedded in VariationGroup)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationOption {
    pub id: i64,
    pub name: String,
    /// Signed price adjustment (positive=add, negative=subtract)
    pub price_adjustment: Decimal,
    pub target: OptionTarget,
}

/// Variation group entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationGroup {
    pub id: i64,
    pub name: String,
    pub selection_mode: SelectionMode,
    /// Hide this group when the owning item is itself picked as a variation option
    #[serde(default)]
    pub specificity: bool,
    /// Max selections for multi modes (null = unlimited)
    #[serde(default)]
    pub max_selections: Option<u32>,
    pub options: Vec<VariationOption>,
}

impl VariationGroup {
    /// Upper bound on how many options may be chosen at once
    pub fn selection_limit(&self) -> Option<usize> {
        if self.selection_mode.is_multi() {
            self.max_selections.map(|m| m as usize)
        } else {
            Some(1)
        }
    }

    pub fn option(&self, option_id: i64) -> Option<&VariationOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Add-on entity (embedded in MenuItem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    /// Owning concession
    pub concession_id: i64,
    pub name: String,
    pub base_price: Decimal,
    pub is_available: bool,
    /// Category references, in display order
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub variation_groups: Vec<VariationGroup>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub serving_days: BTreeSet<ServingDay>,
}

impl MenuItem {
    pub fn variation_group(&self, group_id: i64) -> Option<&VariationGroup> {
        self.variation_groups.iter().find(|g| g.id == group_id)
    }

    pub fn add_on(&self, add_on_id: i64) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == add_on_id)
    }

    /// Groups to show for this item.
    ///
    /// `as_option` is true when the item is being picked as a variation option
    /// of another item; groups flagged with `specificity` are hidden then.
    pub fn visible_variation_groups(&self, as_option: bool) -> Vec<&VariationGroup> {
        self.variation_groups
            .iter()
            .filter(|g| !(as_option && g.specificity))
            .collect()
    }

    /// Menu items referenced by this item's variation options
    pub fn referenced_items(&self) -> impl Iterator<Item = i64> + '_ {
        self.variation_groups
            .iter()
            .flat_map(|g| g.options.iter())
            .filter_map(|o| match o.target {
                OptionTarget::MenuItem(id) => Some(id),
                OptionTarget::Category(_) => None,
            })
    }

    /// Assign a category to the item.
    ///
    /// A category on the item cannot also act as a filter inside its own
    /// variation groups, so matching filter options are dropped.
    pub fn assign_category(&mut self, category_id: i64) {
        if !self.categories.contains(&category_id) {
            self.categories.push(category_id);
        }
        for group in &mut self.variation_groups {
            group
                .options
                .retain(|o| o.target != OptionTarget::Category(category_id));
        }
    }

    pub fn is_served_on(&self, day: ServingDay) -> bool {
        self.serving_days.contains(&day)
    }
}
