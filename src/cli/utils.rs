use serde::Serialize;

use crate::collections::CollectionRegistry;
use crate::config::config;

/// Registry built from the process configuration
pub fn load_registry() -> CollectionRegistry {
    CollectionRegistry::new(config())
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render an optional value for a text table cell
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
