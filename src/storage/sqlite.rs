//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::Result;
use crate::item::{normalize_quantity, GroceryItem, ItemId, ItemStats};
use super::schema;

/// SQLite-backed storage for the grocery list
pub struct GroceryStore {
    conn: Connection,
}

impl GroceryStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        tracing::debug!("Opened grocery store at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the schema exists. Safe to call any number of times.
    pub fn initialize(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Whether the items table is present
    pub fn is_initialized(&self) -> Result<bool> {
        let found: Option<String> = self.conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [schema::ITEMS_TABLE],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ========== Reads ==========

    /// All items, newest first
    pub fn list_all(&self) -> Result<Vec<GroceryItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, quantity, category, bought, created_at FROM items ORDER BY created_at DESC, id DESC"
        )?;

        let items = stmt
            .query_map([], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Listed {} items", items.len());
        Ok(items)
    }

    /// Get an item by id
    pub fn get(&self, id: ItemId) -> Result<Option<GroceryItem>> {
        self.conn
            .query_row(
                "SELECT id, name, quantity, category, bought, created_at FROM items WHERE id = ?1",
                [id.0],
                row_to_item,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Item counts, bought and pending
    pub fn stats(&self) -> Result<ItemStats> {
        let (total, bought): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(bought = 1), 0) FROM items",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(ItemStats {
            total: total as usize,
            bought: bought as usize,
            pending: (total - bought) as usize,
        })
    }

    // ========== Writes ==========

    /// Insert a new, not yet bought item stamped with the current time.
    ///
    /// The name is stored as given; trimming and the non-empty check belong
    /// to the caller (see `ItemForm`).
    pub fn add(&self, name: &str, quantity: i64, category: &str) -> Result<ItemId> {
        let now = chrono::Utc::now().timestamp_millis();
        self.insert_item(name, quantity, category, now)
    }

    fn insert_item(&self, name: &str, quantity: i64, category: &str, created_at: i64) -> Result<ItemId> {
        self.conn.execute(
            r#"
            INSERT INTO items (name, quantity, category, bought, created_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            "#,
            params![name, normalize_quantity(quantity), category, created_at],
        )?;
        let id = ItemId(self.conn.last_insert_rowid());
        tracing::debug!(%id, item = name, "Added item");
        Ok(id)
    }

    /// Overwrite name, quantity and category. Returns `false` if no row has `id`.
    pub fn update(&self, id: ItemId, name: &str, quantity: i64, category: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE items SET name = ?1, quantity = ?2, category = ?3 WHERE id = ?4",
            params![name, normalize_quantity(quantity), category, id.0],
        )?;
        tracing::debug!(%id, changed, "Updated item");
        Ok(changed > 0)
    }

    /// Set the bought flag. Returns `false` if no row has `id`.
    pub fn toggle_bought(&self, id: ItemId, bought: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE items SET bought = ?1 WHERE id = ?2",
            params![bought as i64, id.0],
        )?;
        tracing::debug!(%id, bought, changed, "Set bought flag");
        Ok(changed > 0)
    }

    /// Delete an item. Returns `false` if no row has `id`.
    pub fn remove(&self, id: ItemId) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM items WHERE id = ?1", [id.0])?;
        tracing::debug!(%id, changed, "Removed item");
        Ok(changed > 0)
    }

    /// Delete every bought item, returning how many went
    pub fn remove_all_bought(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM items WHERE bought = 1", [])?;
        tracing::debug!(removed, "Removed bought items");
        Ok(removed)
    }
}

/// Helper to convert a row to a GroceryItem
///
/// Columns written by other tools may be NULL; they read back as the
/// column defaults.
fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<GroceryItem> {
    let quantity: Option<i64> = row.get(2)?;
    let category: Option<String> = row.get(3)?;
    let bought: Option<i64> = row.get(4)?;
    let created_at: Option<i64> = row.get(5)?;

    Ok(GroceryItem {
        id: ItemId(row.get(0)?),
        name: row.get(1)?,
        quantity: quantity.map(normalize_quantity).unwrap_or(1),
        category: category.unwrap_or_default(),
        bought: bought.unwrap_or(0) != 0,
        created_at: created_at.unwrap_or(0),
    })
}
