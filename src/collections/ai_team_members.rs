use super::{AdminConfig, CollectionConfig};
use super::fields::Field;
use crate::access::AdminOnly;

pub const SLUG: &str = "ai_team_members";

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            description: Some("AI team members"),
            default_columns: vec!["name", "role", "active"],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::text("name").label("Name").required(),
            Field::text("role").label("Role"),
            Field::json("skills")
                .label("Skills (JSON)")
                .description("Store skills as a JSON array or object (e.g., [\"Python\", \"NLP\"])"),
            Field::checkbox("active").label("Active").default_value(true),
        ],
        access: Box::new(AdminOnly),
    }
}
