//! Item types - the one entity kept on the list
//!
//! A `GroceryItem` is a persisted row; an `ItemDraft` is the validated
//! input used to create or overwrite one.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Quantity stored when the given one is missing or not positive
pub const DEFAULT_QUANTITY: i64 = 1;

/// Row identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        s.trim()
            .trim_start_matches('#')
            .parse::<i64>()
            .map(ItemId)
            .map_err(|_| crate::Error::InvalidItem(format!("not an item id: {}", s)))
    }
}

/// A thing to buy, as stored in the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroceryItem {
    /// Immutable identifier
    pub id: ItemId,
    pub name: String,
    pub quantity: i64,
    /// Free-form grouping, may be empty
    pub category: String,
    pub bought: bool,
    /// Creation time in epoch milliseconds, never updated
    pub created_at: i64,
}

impl GroceryItem {
    /// Creation time in the local timezone, if the stored value is representable
    pub fn created_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.created_at).single()
    }

    /// Whether the item's category matches `category`, ignoring case and padding
    pub fn in_category(&self, category: &str) -> bool {
        self.category.trim().eq_ignore_ascii_case(category.trim())
    }
}

/// Validated fields for an add or an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: i64,
    pub category: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, quantity: i64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: normalize_quantity(quantity),
            category: category.into(),
        }
    }
}

/// Quantities below one fall back to `DEFAULT_QUANTITY`.
pub fn normalize_quantity(quantity: i64) -> i64 {
    if quantity < 1 { DEFAULT_QUANTITY } else { quantity }
}

/// Counts over the whole list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ItemStats {
    pub total: usize,
    pub bought: usize,
    pub pending: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(category: &str) -> GroceryItem {
        GroceryItem {
            id: ItemId(1),
            name: "Milk".into(),
            quantity: 2,
            category: category.into(),
            bought: false,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_normalize_quantity() {
        assert_eq!(normalize_quantity(3), 3);
        assert_eq!(normalize_quantity(1), 1);
        assert_eq!(normalize_quantity(0), DEFAULT_QUANTITY);
        assert_eq!(normalize_quantity(-4), DEFAULT_QUANTITY);
    }

    #[test]
    fn test_draft_normalizes_quantity() {
        let draft = ItemDraft::new("Eggs", 0, "");
        assert_eq!(draft.quantity, 1);
    }

    #[test]
    fn test_item_id_parse() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId(42));
        assert_eq!("#7".parse::<ItemId>().unwrap(), ItemId(7));
        assert!("milk".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_in_category() {
        let item = sample("Drinks ");
        assert!(item.in_category("drinks"));
        assert!(!item.in_category("Dairy"));
        assert!(sample("").in_category(""));
    }

    #[test]
    fn test_created_local() {
        assert!(sample("").created_local().is_some());
    }
}
