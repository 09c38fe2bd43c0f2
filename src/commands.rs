use crate::{OutputMode, emit_success};
use grocery::app::FormMode;
use grocery::config::{self, GroceryConfig};
use grocery::ui::{self, Icons, dim, header, info, items_table, section, stats_table, success, warn};
use grocery::{GroceryApp, GroceryItem, ItemForm, ItemId, ListFilter};
use owo_colors::OwoColorize;
use std::path::Path;

/// Show the app's pending alert (human mode) and hand the error on
fn report<T>(app: &mut GroceryApp, output_mode: OutputMode, result: grocery::Result<T>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Some(alert) = app.take_alert() {
                if output_mode.is_human() {
                    ui::alert(&alert);
                }
            }
            Err(e.into())
        }
    }
}

fn render_items(items: &[GroceryItem], title: &str) {
    header(title);
    if items.is_empty() {
        println!("{} {}", Icons::EMPTY, dim("Nothing here."));
    } else {
        println!("{}", items_table(items));
    }
}

/// Print the list as re-fetched by the last write
fn show_list(app: &mut GroceryApp) {
    if let Some(alert) = app.take_alert() {
        ui::alert(&alert);
        return;
    }
    println!();
    render_items(app.items(), &format!("Grocery list ({} items)", app.items().len()));
}

pub fn run_init(app: &mut GroceryApp, output_mode: OutputMode, database: &Path) -> anyhow::Result<()> {
    let result = app.store().and_then(|store| {
        store.initialize()?;
        store.stats()
    });
    let stats = report(app, output_mode, result)?;

    if output_mode.is_human() {
        success("Grocery list ready");
        info(&format!("{} Database", Icons::DATABASE), &database.display().to_string());
        info("Items", &stats.total.to_string());
    } else {
        let data = serde_json::json!({
            "database": database.display().to_string(),
            "items": stats.total,
        });
        emit_success(output_mode, "init", data)?;
    }
    Ok(())
}

pub fn run_list(app: &mut GroceryApp, output_mode: OutputMode, filter: &ListFilter) -> anyhow::Result<()> {
    let result = app.refresh().map(|items| filter.apply(items));
    let items = report(app, output_mode, result)?;

    if output_mode.is_human() {
        let title = match filter.bought {
            Some(false) => "Still to buy",
            Some(true) => "Already bought",
            None => "Grocery list",
        };
        let title = match filter.category.as_deref() {
            Some(category) => format!("{} in {} ({} items)", title, category, items.len()),
            None => format!("{} ({} items)", title, items.len()),
        };
        render_items(&items, &title);
    } else {
        emit_success(output_mode, "list", serde_json::to_value(&items)?)?;
    }
    Ok(())
}

pub fn run_add(app: &mut GroceryApp, output_mode: OutputMode, form: ItemForm) -> anyhow::Result<()> {
    let result = app.submit(FormMode::Add, &form);
    let id = report(app, output_mode, result)?;

    if output_mode.is_human() {
        success(&format!("{} Added {} (#{})", Icons::NEW, form.name.trim(), id));
        show_list(app);
    } else {
        let item = app.store()?.get(id)?;
        emit_success(output_mode, "add", serde_json::to_value(item)?)?;
    }
    Ok(())
}

pub fn run_edit(
    app: &mut GroceryApp,
    output_mode: OutputMode,
    id: ItemId,
    name: Option<String>,
    quantity: Option<String>,
    category: Option<String>,
) -> anyhow::Result<()> {
    let current = app.edit_form(id);
    let mut form = report(app, output_mode, current)?;
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(quantity) = quantity {
        form.quantity = quantity;
    }
    if let Some(category) = category {
        form.category = category;
    }

    let result = app.submit(FormMode::Edit(id), &form);
    report(app, output_mode, result)?;

    if output_mode.is_human() {
        success(&format!("{} Updated #{}", Icons::EDIT, id));
        show_list(app);
    } else {
        let item = app.store()?.get(id)?;
        emit_success(output_mode, "edit", serde_json::to_value(item)?)?;
    }
    Ok(())
}

pub fn run_set_bought(app: &mut GroceryApp, output_mode: OutputMode, id: ItemId, bought: bool) -> anyhow::Result<()> {
    let result = app.set_bought(id, bought);
    let changed = report(app, output_mode, result)?;

    if output_mode.is_human() {
        if !changed {
            warn(&format!("No item #{}", id));
            return Ok(());
        }
        if bought {
            success(&format!("Marked #{} as bought", id));
        } else {
            success(&format!("Marked #{} as still to buy", id));
        }
        show_list(app);
    } else {
        let data = serde_json::json!({ "id": id, "bought": bought, "changed": changed });
        emit_success(output_mode, "bought", data)?;
    }
    Ok(())
}

pub fn run_toggle(app: &mut GroceryApp, output_mode: OutputMode, id: ItemId) -> anyhow::Result<()> {
    let result = app.toggle(id);
    let flag = report(app, output_mode, result)?;

    if output_mode.is_human() {
        match flag {
            Some(true) => success(&format!("Marked #{} as bought", id)),
            Some(false) => success(&format!("Marked #{} as still to buy", id)),
            None => {
                warn(&format!("No item #{}", id));
                return Ok(());
            }
        }
        show_list(app);
    } else {
        let data = serde_json::json!({ "id": id, "bought": flag });
        emit_success(output_mode, "toggle", data)?;
    }
    Ok(())
}

pub fn run_remove(app: &mut GroceryApp, output_mode: OutputMode, id: ItemId) -> anyhow::Result<()> {
    let result = app.delete(id);
    let removed = report(app, output_mode, result)?;

    if output_mode.is_human() {
        if removed {
            success(&format!("{} Removed #{}", Icons::DEL, id));
            show_list(app);
        } else {
            warn(&format!("No item #{}", id));
        }
    } else {
        let data = serde_json::json!({ "id": id, "removed": removed });
        emit_success(output_mode, "remove", data)?;
    }
    Ok(())
}

pub fn run_clear_bought(app: &mut GroceryApp, output_mode: OutputMode) -> anyhow::Result<()> {
    let result = app.clear_bought();
    let removed = report(app, output_mode, result)?;

    if output_mode.is_human() {
        if removed == 0 {
            println!("{} {}", Icons::EMPTY, dim("No bought items to clear."));
        } else {
            success(&format!("Cleared {} bought item(s)", removed));
        }
        show_list(app);
    } else {
        emit_success(output_mode, "clear-bought", serde_json::json!({ "removed": removed }))?;
    }
    Ok(())
}

pub fn run_stats(app: &GroceryApp, output_mode: OutputMode, database: &Path) -> anyhow::Result<()> {
    let stats = app.store()?.stats()?;

    if output_mode.is_human() {
        println!(
            "{} {}",
            Icons::STATS,
            format!("Grocery Statistics ({})", database.display()).style(ui::theme().header.clone())
        );
        println!("{}", stats_table(&stats));
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(stats)?)?;
    }
    Ok(())
}

pub fn run_config_init(output_mode: OutputMode, path: &Path, force: bool) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let database = config::default_database_path_in(&cwd);
    let cfg = GroceryConfig {
        database: Some(database.display().to_string()),
    };
    config::write_config(path, &cfg, force)?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
        section("Config");
        info("database", &database.display().to_string());
    } else {
        let data = serde_json::json!({
            "path": path.display().to_string(),
            "config": cfg,
        });
        emit_success(output_mode, "config-init", data)?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        println!(
            "{} {} {}",
            Icons::CART,
            "grocery".bold().style(ui::theme().info.clone()),
            format!("Version {}", env!("CARGO_PKG_VERSION")).bold()
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}
