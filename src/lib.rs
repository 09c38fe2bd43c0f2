//! # Grocery - local grocery list
//!
//! Keeps a shopping list in a single SQLite table.
//!
//! Grocery provides:
//! - `GroceryStore`, the data accessor over the `items` table
//! - `ItemForm` for validating raw add/edit input
//! - `GroceryApp`, the list view state driven by UI events
//! - Terminal rendering helpers for the `grocery` binary

pub mod item;
pub mod storage;
pub mod form;
pub mod app;
pub mod ui;
pub mod output;
pub mod config;


// Re-exports for convenient access
pub use item::{GroceryItem, ItemDraft, ItemId, ItemStats};
pub use form::ItemForm;
pub use app::{Alert, FormMode, GroceryApp, ListFilter};
pub use storage::GroceryStore;

/// Result type alias for Grocery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Grocery operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}
