use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GroceryConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("grocery.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".grocery").join("grocery.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<GroceryConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: GroceryConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &GroceryConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the database file: explicit flag, then config, then the default
/// under `base`.
pub fn resolve_database_path(flag: Option<&Path>, config: Option<&GroceryConfig>, base: &Path) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match config.and_then(|c| c.database.as_deref()) {
        Some(db) if !db.trim().is_empty() => PathBuf::from(db),
        _ => default_database_path_in(base),
    }
}

/// Create the database's parent directory if it is missing
pub fn ensure_db_dir(db_path: &Path) -> crate::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
