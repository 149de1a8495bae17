use super::{AdminConfig, CollectionConfig};
use super::fields::{Field, ReadOnly};
use crate::access::TenantScoped;
use crate::hooks::StampOwningClient;

pub const SLUG: &str = "ai_bots";
pub const OWNER_FIELD: &str = "linked_client";

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            default_columns: vec!["bot_name", "service_type", OWNER_FIELD],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::text("bot_name").label("Bot Name").required(),
            Field::text("service_type").label("Service Type"),
            // Every bot belongs to exactly one client
            Field::relationship(OWNER_FIELD, super::clients::SLUG)
                .label("Linked Client")
                .required()
                .read_only(ReadOnly::ForLinkedClients)
                .hook(StampOwningClient),
        ],
        access: Box::new(TenantScoped::new(OWNER_FIELD)),
    }
}
