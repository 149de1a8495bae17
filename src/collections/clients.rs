use super::{AdminConfig, CollectionConfig};
use super::fields::Field;
use crate::access::OwnClientRecord;

pub const SLUG: &str = "clients";

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            description: Some("Client information"),
            use_as_title: Some("name"),
            default_columns: vec!["name", "email", "phone", "business_name"],
        },
        fields: vec![
            Field::text("name").label("Client Name").required(),
            Field::email("email").label("Email Address").unique(),
            Field::text("phone").label("Phone Number"),
            Field::text("business_name").label("Business Name"),
        ],
        access: Box::new(OwnClientRecord),
    }
}
