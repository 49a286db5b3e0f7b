//! The `schoolboard config set` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut, Item, Table};

use schoolboard_client::SchoolboardConfig;

const INTEGER_KEYS: &[&str] = &["timeout_secs", "page_size"];
const STRING_KEYS: &[&str] = &["base_url", "session_file", "auth.email", "auth.password"];

/// Set `key` in the config file, keeping its comments and layout.
///
/// Writes to `--config` when given, otherwise to `schoolboard.toml` in the
/// current directory, creating it if needed.
pub fn set(config_path: Option<PathBuf>, key: String, raw: String) -> Result<()> {
    let path = config_path.unwrap_or_else(|| PathBuf::from("schoolboard.toml"));
    let content = if path.exists() {
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    let item = if INTEGER_KEYS.contains(&key.as_str()) {
        let n: i64 = raw
            .parse()
            .with_context(|| format!("{key} must be a whole number, got '{raw}'"))?;
        value(n)
    } else if STRING_KEYS.contains(&key.as_str()) {
        value(raw.as_str())
    } else {
        anyhow::bail!(
            "unknown config key '{key}' (expected one of: {}, {})",
            INTEGER_KEYS.join(", "),
            STRING_KEYS.join(", ")
        );
    };

    match key.split_once('.') {
        Some((table, field)) => {
            let table = doc
                .entry(table)
                .or_insert(Item::Table(Table::new()))
                .as_table_mut()
                .with_context(|| format!("'{table}' in {} is not a table", path.display()))?;
            table[field] = item;
        }
        None => doc[key.as_str()] = item,
    }

    let updated = doc.to_string();
    toml::from_str::<SchoolboardConfig>(&updated)
        .with_context(|| format!("setting {key} would make the config invalid"))?;
    std::fs::write(&path, updated)
        .with_context(|| format!("failed to write config: {}", path.display()))?;

    let shown = if key == "auth.password" { "****" } else { raw.as_str() };
    println!("Set {key} = {shown} in {}", path.display());
    Ok(())
}
