//! Add/edit form input
//!
//! Holds the raw text a user typed and turns it into an `ItemDraft`.

use crate::item::{GroceryItem, ItemDraft, DEFAULT_QUANTITY, normalize_quantity};
use crate::{Error, Result};

/// Raw form fields, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub quantity: String,
    pub category: String,
}

impl ItemForm {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            category: category.into(),
        }
    }

    /// Form prefilled from an existing item, for editing
    pub fn from_item(item: &GroceryItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity.to_string(),
            category: item.category.clone(),
        }
    }

    /// Validate into a draft.
    ///
    /// The name must be non-empty after trimming. A quantity that is blank,
    /// not an integer, or below one becomes `DEFAULT_QUANTITY`.
    pub fn validate(&self) -> Result<ItemDraft> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidItem("name is required".to_string()));
        }

        Ok(ItemDraft::new(name, parse_quantity(&self.quantity), self.category.trim()))
    }
}

/// Lenient quantity parse used by the form
pub fn parse_quantity(raw: &str) -> i64 {
    raw.trim()
        .parse::<i64>()
        .map(normalize_quantity)
        .unwrap_or(DEFAULT_QUANTITY)
}
