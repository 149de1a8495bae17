use serde_json::json;

use crate::access::AccessArgs;
use crate::auth::{Actor, AuthUser, ClientRef};
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::types::{Operation, Role};

/// Identity flags for the evaluated actor
#[derive(Debug, Clone, Default)]
pub struct ActorArgs {
    pub role: Option<Role>,
    pub user_id: Option<String>,
    pub client: Option<String>,
}

impl ActorArgs {
    pub fn into_actor(self) -> Actor {
        let role = match self.role {
            Some(role) => role,
            None => {
                if self.user_id.is_some() || self.client.is_some() {
                    tracing::warn!("--user-id/--client ignored without --role; evaluating as anonymous");
                }
                return Actor::Anonymous;
            }
        };

        Actor::User(AuthUser {
            id: self.user_id.unwrap_or_else(|| format!("cli-{}", role)),
            email: String::new(),
            role,
            client: self.client.map(ClientRef::Id),
        })
    }
}

pub async fn handle(
    slug: String,
    actor: ActorArgs,
    target_id: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let registry = load_registry();
    let collection = registry.require(&slug)?;
    let actor = actor.into_actor();

    let mut args = AccessArgs::new(&actor);
    if let Some(ref id) = target_id {
        args = args.with_id(id);
    }

    let decisions: Vec<_> = Operation::ALL
        .iter()
        .map(|&operation| (operation, collection.evaluate(operation, &args)))
        .collect();

    match output_format {
        OutputFormat::Json => {
            let mut by_operation = serde_json::Map::new();
            for (operation, decision) in &decisions {
                by_operation.insert(operation.to_string(), decision.to_json());
            }
            print_json(&json!({
                "collection": collection.slug,
                "access": collection.access.name(),
                "actor": actor.describe(),
                "admin_visible": collection.admin_visible(&actor),
                "decisions": by_operation
            }))?;
        }
        OutputFormat::Text => {
            println!("Collection: {} ({})", collection.slug, collection.access.name());
            println!("Actor: {}", actor.describe());
            println!("Admin visible: {}", collection.admin_visible(&actor));
            println!();
            println!("{:<10} {}", "OPERATION", "DECISION");
            println!("{}", "-".repeat(50));
            for (operation, decision) in &decisions {
                println!("{:<10} {}", operation, decision.to_json());
            }
        }
    }

    Ok(())
}
