use super::{AdminConfig, CollectionConfig};
use super::fields::{DatePicker, Field, ReadOnly, SelectOption};
use crate::access::TenantScoped;
use crate::hooks::StampOwningClient;

pub const SLUG: &str = "invoices";
pub const OWNER_FIELD: &str = "client";

pub const STATUS_OPTIONS: [SelectOption; 3] = [
    SelectOption::new("Pending", "pending"),
    SelectOption::new("Paid", "paid"),
    SelectOption::new("Overdue", "overdue"),
];

pub fn collection() -> CollectionConfig {
    CollectionConfig {
        slug: SLUG,
        auth: false,
        admin: AdminConfig {
            description: Some("Invoices for clients"),
            default_columns: vec![OWNER_FIELD, "amount", "status", "due_date"],
            ..AdminConfig::default()
        },
        fields: vec![
            Field::relationship(OWNER_FIELD, super::clients::SLUG)
                .label("Client")
                .required()
                .read_only(ReadOnly::ForLinkedClients)
                .hook(StampOwningClient),
            Field::number("amount").label("Amount").required(),
            Field::select("status", &STATUS_OPTIONS)
                .label("Status")
                .required()
                .default_value("pending"),
            Field::date("due_date", DatePicker::DayOnly).label("Due Date"),
        ],
        access: Box::new(TenantScoped::new(OWNER_FIELD)),
    }
}
