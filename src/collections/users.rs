use super::{AdminConfig, CollectionConfig};
use super::fields::{Field, ReadOnly, SelectOption};
use crate::access::UserAccounts;
use crate::hooks::StampOwningClient;

pub const SLUG: &str = "users";

pub const ROLE_OPTIONS: [SelectOption; 2] = [
    SelectOption::new("Admin", "admin"),
    SelectOption::new("Client", "client"),
];

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: true,
        admin: AdminConfig {
            use_as_title: Some("email"),
            default_columns: vec!["email", "role", "client"],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::email("email").label("Email").required().unique(),
            // Clients must not be able to promote themselves
            Field::select("role", &ROLE_OPTIONS)
                .required()
                .default_value("client")
                .read_only(ReadOnly::ForNonAdmins),
            Field::relationship("client", super::clients::SLUG)
                .read_only(ReadOnly::ForAnonymousAndClients)
                .hook(StampOwningClient),
        ],
        access: Box::new(UserAccounts),
    }
}
