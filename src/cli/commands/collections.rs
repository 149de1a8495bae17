use serde_json::json;

use crate::cli::utils::*;
use crate::cli::OutputFormat;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = load_registry();

    match output_format {
        OutputFormat::Json => {
            let collections: Vec<_> = registry
                .iter()
                .map(|collection| {
                    json!({
                        "slug": collection.slug,
                        "auth": collection.auth,
                        "title": collection.admin.use_as_title,
                        "owner_field": collection.owner_field(),
                        "access": collection.access.name(),
                        "fields": collection.fields.len()
                    })
                })
                .collect();
            print_json(&json!({ "collections": collections }))?;
        }
        OutputFormat::Text => {
            println!("{:<18} {:<10} {:<15} {:<16} {}", "SLUG", "TITLE", "OWNER FIELD", "ACCESS", "FIELDS");
            println!("{}", "-".repeat(70));

            for collection in registry.iter() {
                let auth_marker = if collection.auth { "*" } else { " " };
                println!(
                    "{}{:<17} {:<10} {:<15} {:<16} {}",
                    auth_marker,
                    collection.slug,
                    or_dash(collection.admin.use_as_title),
                    or_dash(collection.owner_field()),
                    collection.access.name(),
                    collection.fields.len()
                );
            }
        }
    }

    Ok(())
}
