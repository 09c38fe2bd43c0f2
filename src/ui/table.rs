use crate::item::{GroceryItem, ItemStats};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &ItemStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Items", &stats.total.to_string());
    builder.add_row("Bought", &stats.bought.to_string());
    builder.add_row("Pending", &stats.pending.to_string());
    builder.build()
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    id: String,
    #[tabled(rename = " ")]
    status: String,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Qty")]
    quantity: i64,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Added")]
    added: String,
}

impl ItemRow {
    fn from_item(item: &GroceryItem) -> Self {
        let (status, name) = if item.bought {
            (Icons::BOUGHT, item.name.style(theme().bought.clone()).to_string())
        } else {
            (Icons::PENDING, item.name.clone())
        };

        Self {
            id: item.id.to_string(),
            status: status.to_string(),
            name,
            quantity: item.quantity,
            category: item.category.clone(),
            added: item
                .created_local()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Render items in the order given; empty string for an empty list
pub fn items_table(items: &[GroceryItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: Vec<ItemRow> = items.iter().map(ItemRow::from_item).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
