use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::collections::HashMap;

use crate::collections::{CollectionConfig, Field, FieldKind};
use crate::filter::row_filter::reference_key;
use crate::types::Document;

/// Check a complete document against its collection's fields
///
/// Returns field name → message for every failing field.
pub fn validate_document(collection: &CollectionConfig, doc: &Document) -> HashMap<String, String> {
    let mut field_errors = HashMap::new();

    for field in &collection.fields {
        match doc.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    field_errors.insert(field.name.to_string(), "This field is required".to_string());
                }
            }
            Some(Value::String(s)) if s.is_empty() && field.required => {
                field_errors.insert(field.name.to_string(), "This field is required".to_string());
            }
            Some(value) => {
                if let Err(message) = validate_value(field, value) {
                    field_errors.insert(field.name.to_string(), message);
                }
            }
        }
    }

    field_errors
}

fn validate_value(field: &Field, value: &Value) -> Result<(), String> {
    match &field.kind {
        FieldKind::Text | FieldKind::Textarea => match value {
            Value::String(_) => Ok(()),
            _ => Err("Expected text".to_string()),
        },
        FieldKind::Email => match value {
            Value::String(s) if s.contains('@') => Ok(()),
            _ => Err("Expected an email address".to_string()),
        },
        FieldKind::Number => match value {
            Value::Number(_) => Ok(()),
            _ => Err("Expected a number".to_string()),
        },
        FieldKind::Checkbox => match value {
            Value::Bool(_) => Ok(()),
            _ => Err("Expected true or false".to_string()),
        },
        FieldKind::Json => Ok(()),
        FieldKind::Date { .. } => match value {
            Value::String(s) if is_date(s) => Ok(()),
            _ => Err("Expected an ISO 8601 date".to_string()),
        },
        FieldKind::Select { options } => match value {
            Value::String(s) if options.iter().any(|o| o.value == s.as_str()) => Ok(()),
            _ => {
                let allowed: Vec<&str> = options.iter().map(|o| o.value).collect();
                Err(format!("Must be one of: {}", allowed.join(", ")))
            }
        },
        FieldKind::Relationship { has_many, relation_to } => {
            let valid = match value {
                Value::Array(items) if *has_many => items.iter().all(|item| reference_key(item).is_some()),
                other => reference_key(other).is_some(),
            };
            if valid {
                Ok(())
            } else {
                Err(format!("Expected a reference to {}", relation_to))
            }
        }
    }
}

fn is_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::invoices;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn valid_invoice_passes() {
        let errors = validate_document(
            &invoices::collection(),
            &doc(json!({ "client": "c-1", "amount": 120.5, "status": "paid", "due_date": "2024-03-01" })),
        );
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn reports_each_failing_field() {
        let errors = validate_document(
            &invoices::collection(),
            &doc(json!({ "amount": "lots", "status": "refunded", "due_date": "next tuesday" })),
        );
        assert_eq!(errors.get("client").map(String::as_str), Some("This field is required"));
        assert_eq!(errors.get("amount").map(String::as_str), Some("Expected a number"));
        assert_eq!(errors.get("status").map(String::as_str), Some("Must be one of: pending, paid, overdue"));
        assert!(errors.contains_key("due_date"));
    }

    #[test]
    fn rfc3339_timestamps_are_dates() {
        assert!(is_date("2024-03-01T10:15:00Z"));
        assert!(is_date("2024-03-01T10:15:00+02:00"));
        assert!(!is_date("03/01/2024"));
    }
}
