//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - items(id, name, quantity, category, bought, created_at)

pub mod schema;
pub mod sqlite;

pub use sqlite::GroceryStore;
