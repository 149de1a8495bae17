pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::types::Role;

#[derive(Parser)]
#[command(name = "magicbot")]
#[command(about = "Magicbot CLI - Inspect collections and access policies of the Magicbot backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List collections with their title and owner fields")]
    Collections,

    #[command(about = "Show a collection's fields, admin settings and access policy")]
    Describe {
        #[arg(help = "Collection slug")]
        slug: String,

        #[arg(long, help = "Print as YAML")]
        yaml: bool,
    },

    #[command(about = "Evaluate a collection's access policy for an actor")]
    Access {
        #[arg(help = "Collection slug")]
        slug: String,

        #[arg(long, help = "Actor role (admin|client); anonymous when omitted")]
        role: Option<Role>,

        #[arg(long, help = "Actor user ID")]
        user_id: Option<String>,

        #[arg(long, help = "Actor's owning client ID")]
        client: Option<String>,

        #[arg(long, help = "Target record ID for update/delete")]
        target_id: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Collections => commands::collections::handle(output_format).await,
        Commands::Describe { slug, yaml } => commands::describe::handle(slug, yaml, output_format).await,
        Commands::Access { slug, role, user_id, client, target_id } => {
            let actor = commands::access::ActorArgs { role, user_id, client };
            commands::access::handle(slug, actor, target_id, output_format).await
        }
    }
}
