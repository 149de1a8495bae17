use super::{AdminConfig, CollectionConfig};
use super::fields::Field;
use crate::access::AdminOnly;
use crate::hooks::SlugFromField;

pub const SLUG: &str = "tenants";

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            default_columns: vec!["name", "slug"],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::text("name").label("Tenant Name").required().unique(),
            Field::text("slug")
                .label("Tenant Slug (for URLs/identification)")
                .required()
                .unique()
                .sidebar()
                .hook(SlugFromField::new("name")),
        ],
        access: Box::new(AdminOnly),
    }
}
