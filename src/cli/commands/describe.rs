use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::collections::FieldKind;

pub async fn handle(slug: String, yaml: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = load_registry();
    let collection = registry.require(&slug)?;

    if yaml {
        print!("{}", serde_yaml::to_string(collection)?);
        return Ok(());
    }

    match output_format {
        OutputFormat::Json => print_json(collection)?,
        OutputFormat::Text => {
            println!("Collection: {}", collection.slug);
            if let Some(description) = collection.admin.description {
                println!("Description: {}", description);
            }
            println!("Access: {}", collection.access.name());
            if let Some(owner) = collection.owner_field() {
                println!("Owner field: {}", owner);
            }
            println!();

            println!("{:<16} {:<22} {:<9} {:<26} {}", "FIELD", "TYPE", "REQUIRED", "READ ONLY", "HOOKS");
            println!("{}", "-".repeat(90));

            for field in &collection.fields {
                let kind = match &field.kind {
                    FieldKind::Relationship { relation_to, .. } => format!("relationship:{}", relation_to),
                    FieldKind::Select { .. } => format!("select({})", field.option_values().unwrap_or_default().join("|")),
                    other => serde_json::to_value(other)?
                        .get("type")
                        .and_then(|t| t.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                };
                let hooks: Vec<&str> = field.hooks.iter().map(|hook| hook.name()).collect();

                println!(
                    "{:<16} {:<22} {:<9} {:<26} {}",
                    field.name,
                    kind,
                    if field.required { "yes" } else { "no" },
                    format!("{:?}", field.read_only),
                    hooks.join(", ")
                );
            }
        }
    }

    Ok(())
}
