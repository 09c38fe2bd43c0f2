//! Grocery CLI - keep a shopping list in a local SQLite file

mod commands;

use clap::{Parser, Subcommand};
use grocery::{config, ui, GroceryApp, ItemId, ListFilter};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "grocery")]
#[command(version)]
#[command(about = "Grocery list manager backed by a local SQLite file")]
#[command(long_about = r#"
Grocery keeps your shopping list in a local SQLite database.

Example usage:
  grocery add "Milk" -q 2 -c Drinks
  grocery list --pending
  grocery bought 1
  grocery clear-bought
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its table if missing
    Init,

    /// Show the list, newest first
    List {
        /// Only items still to buy
        #[arg(long, conflicts_with = "bought")]
        pending: bool,

        /// Only items already bought
        #[arg(long)]
        bought: bool,

        /// Only items in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add an item
    Add {
        /// Item name
        name: String,

        /// How many (anything but a positive whole number counts as 1)
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: String,

        /// Category, e.g. "Dairy"
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// Edit an item; fields not given keep their current value
    Edit {
        /// Item id
        id: ItemId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Mark an item as bought
    Bought {
        /// Item id
        id: ItemId,

        /// Mark as not bought instead
        #[arg(long)]
        undo: bool,
    },

    /// Flip an item's bought flag
    Toggle {
        /// Item id
        id: ItemId,
    },

    /// Delete an item
    Remove {
        /// Item id
        id: ItemId,
    },

    /// Delete every bought item
    ClearBought,

    /// Show item counts
    Stats,

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the version
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

fn success_envelope(command: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    })
}

/// Print a JSON success envelope
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    debug_assert!(!output_mode.is_human());
    println!("{}", serde_json::to_string_pretty(&success_envelope(command, data))?);
    Ok(())
}

/// `--pending` / `--bought` / `--category` as a list filter
fn list_filter(pending: bool, bought: bool, category: Option<String>) -> ListFilter {
    let status = if pending {
        Some(false)
    } else if bought {
        Some(true)
    } else {
        None
    };
    ListFilter { bought: status, category }
}

fn emit_error(output_mode: OutputMode, err: &anyhow::Error) {
    if output_mode.is_human() {
        ui::error(&format!("{:#}", err));
    } else {
        let envelope = serde_json::json!({
            "ok": false,
            "error": format!("{:#}", err),
        });
        println!("{}", envelope);
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    if let Err(e) = run(cli, output_mode) {
        emit_error(output_mode, &e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    // Commands that never touch the database
    match cli.command {
        Commands::Version => return commands::run_version(output_mode),
        Commands::Config { action: ConfigAction::Init { force } } => {
            return commands::run_config_init(output_mode, &config_path, force);
        }
        _ => {}
    }

    let loaded = config::load_config(Some(&config_path))?;
    let cwd = std::env::current_dir()?;
    let database = config::resolve_database_path(cli.database.as_deref(), loaded.as_ref(), &cwd);
    config::ensure_db_dir(&database)?;
    tracing::debug!("Using database {}", database.display());

    let mut app = GroceryApp::start(&database);
    if !app.is_ready() {
        if output_mode.is_human() {
            if let Some(alert) = app.take_alert() {
                ui::alert(&alert);
            }
        }
        anyhow::bail!(
            "initialization failed for {}: {}",
            database.display(),
            app.init_error().unwrap_or("unknown error")
        );
    }

    match cli.command {
        Commands::Init => commands::run_init(&mut app, output_mode, &database),
        Commands::List { pending, bought, category } => {
            commands::run_list(&mut app, output_mode, &list_filter(pending, bought, category))
        }
        Commands::Add { name, quantity, category } => {
            commands::run_add(&mut app, output_mode, grocery::ItemForm::new(name, quantity, category))
        }
        Commands::Edit { id, name, quantity, category } => {
            commands::run_edit(&mut app, output_mode, id, name, quantity, category)
        }
        Commands::Bought { id, undo } => commands::run_set_bought(&mut app, output_mode, id, !undo),
        Commands::Toggle { id } => commands::run_toggle(&mut app, output_mode, id),
        Commands::Remove { id } => commands::run_remove(&mut app, output_mode, id),
        Commands::ClearBought => commands::run_clear_bought(&mut app, output_mode),
        Commands::Stats => commands::run_stats(&app, output_mode, &database),
        Commands::Version | Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocery::GroceryStore;
    use std::path::Path;

    fn cli(db: &Path, args: &[&str]) -> Cli {
        let config = db.with_file_name("grocery.toml");
        let mut argv = vec![
            "grocery".to_string(),
            "--json".to_string(),
            "--database".to_string(),
            db.display().to_string(),
            "--config".to_string(),
            config.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    fn run_json(db: &Path, args: &[&str]) -> anyhow::Result<()> {
        run(cli(db, args), OutputMode::Json)
    }

    #[test]
    fn test_negative_quantity_defaults_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("grocery.db");

        run_json(&db, &["add", "Salt", "-q", "-5"]).unwrap();

        let store = GroceryStore::open(&db).unwrap();
        let items = store.list_all().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Salt");
        assert_eq!(items[0].quantity, 1);

        run_json(&db, &["edit", &items[0].id.to_string(), "--quantity", "-2"]).unwrap();
        assert_eq!(store.get(items[0].id).unwrap().unwrap().quantity, 1);
    }

    #[test]
    fn test_edit_keeps_unset_fields() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("grocery.db");

        run_json(&db, &["add", "Milk", "-q", "2", "-c", "Drinks"]).unwrap();
        let store = GroceryStore::open(&db).unwrap();
        let id = store.list_all().unwrap()[0].id;
        let before = store.get(id).unwrap().unwrap();

        run_json(&db, &["edit", &id.to_string(), "--quantity", "4"]).unwrap();

        let after = store.get(id).unwrap().unwrap();
        assert_eq!(after.name, "Milk");
        assert_eq!(after.category, "Drinks");
        assert_eq!(after.quantity, 4);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn test_edit_missing_item_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("grocery.db");

        assert!(run_json(&db, &["edit", "9", "--name", "Ghost"]).is_err());
        assert!(GroceryStore::open(&db).unwrap().list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_flags_map_to_filter() {
        assert_eq!(list_filter(true, false, None).bought, Some(false));
        assert_eq!(list_filter(false, true, None).bought, Some(true));
        assert_eq!(list_filter(false, false, Some("Dairy".into())), ListFilter {
            bought: None,
            category: Some("Dairy".into()),
        });

        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("grocery.db");
        match cli(&db, &["list", "--pending", "-c", "Fruit"]).command {
            Commands::List { pending, bought, category } => {
                let filter = list_filter(pending, bought, category);
                assert_eq!(filter.bought, Some(false));
                assert_eq!(filter.category.as_deref(), Some("Fruit"));
            }
            _ => panic!("expected list command"),
        }
        assert!(Cli::try_parse_from(["grocery", "list", "--pending", "--bought"]).is_err());
    }

    #[test]
    fn test_write_commands_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("grocery.db");

        run_json(&db, &["add", "Bread"]).unwrap();
        run_json(&db, &["add", "Eggs", "-q", "12"]).unwrap();
        let store = GroceryStore::open(&db).unwrap();
        let eggs = store.list_all().unwrap()[0].id;

        run_json(&db, &["bought", &eggs.to_string()]).unwrap();
        assert!(store.get(eggs).unwrap().unwrap().bought);
        run_json(&db, &["toggle", &eggs.to_string()]).unwrap();
        assert!(!store.get(eggs).unwrap().unwrap().bought);

        run_json(&db, &["bought", &eggs.to_string()]).unwrap();
        run_json(&db, &["list", "--bought"]).unwrap();
        run_json(&db, &["clear-bought"]).unwrap();

        let names: Vec<String> = store.list_all().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Bread"]);

        run_json(&db, &["stats"]).unwrap();
    }

    #[test]
    fn test_success_envelope_shape() {
        let envelope = success_envelope("list", serde_json::json!([]));
        assert_eq!(envelope["ok"], serde_json::json!(true));
        assert_eq!(envelope["command"], serde_json::json!("list"));
        assert_eq!(envelope["data"], serde_json::json!([]));
    }
}
