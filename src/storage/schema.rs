//! Database schema definitions

/// Name of the one table the list lives in
pub const ITEMS_TABLE: &str = "items";

/// SQL to create the items table
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    quantity INTEGER DEFAULT 1,
    category TEXT,
    bought INTEGER DEFAULT 0,
    created_at INTEGER
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_ITEMS_TABLE]
}
