use super::{AdminConfig, CollectionConfig};
use super::fields::{Field, ReadOnly};
use crate::access::TenantScoped;
use crate::hooks::StampOwningClient;

pub const SLUG: &str = "telegram_bots";
pub const OWNER_FIELD: &str = "linked_client";

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            description: Some("Stores Telegram bot tokens for each client"),
            default_columns: vec!["token", OWNER_FIELD],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::text("token").label("Telegram Bot Token").required().unique(),
            Field::relationship(OWNER_FIELD, super::clients::SLUG)
                .label("Linked Client")
                .read_only(ReadOnly::ForLinkedClients)
                .hook(StampOwningClient),
        ],
        access: Box::new(TenantScoped::new(OWNER_FIELD)),
    }
}
