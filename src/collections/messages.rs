use super::{AdminConfig, CollectionConfig};
use super::fields::{DatePicker, Field, ReadOnly, SelectOption};
use crate::access::TenantScoped;
use crate::hooks::StampOwningClient;

pub const SLUG: &str = "messages";
pub const OWNER_FIELD: &str = "client";

pub const PLATFORM_OPTIONS: [SelectOption; 2] = [
    SelectOption::new("WhatsApp", "whatsapp"),
    SelectOption::new("Telegram", "telegram"),
];

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            description: Some("Messages sent by bots"),
            default_columns: vec!["message_text", "platform", "sent_at"],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::textarea("message_text").label("Message Text").required(),
            Field::select("platform", &PLATFORM_OPTIONS).label("Platform").required(),
            Field::date("sent_at", DatePicker::DayAndTime).label("Sent At"),
            Field::relationship("related_bot", super::ai_bots::SLUG).label("Related Bot"),
            Field::relationship(OWNER_FIELD, super::clients::SLUG)
                .label("Client")
                .read_only(ReadOnly::ForLinkedClients)
                .hook(StampOwningClient),
        ],
        access: Box::new(TenantScoped::new(OWNER_FIELD)),
    }
}
