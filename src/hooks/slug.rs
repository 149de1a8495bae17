use serde_json::Value;

use super::{FieldHook, HookArgs};

/// Normalizes a URL slug, deriving it from `source_field` when none is given
#[derive(Debug, Clone, Copy)]
pub struct SlugFromField {
    pub source_field: &'static str,
}

impl SlugFromField {
    pub const fn new(source_field: &'static str) -> Self {
        Self { source_field }
    }
}

impl FieldHook for SlugFromField {
    fn name(&self) -> &'static str {
        "SlugFromField"
    }

    fn before_validate(&self, value: Option<Value>, args: &HookArgs<'_>) -> Option<Value> {
        if let Some(Value::String(supplied)) = &value {
            if !supplied.is_empty() {
                return Some(Value::String(slugify(supplied)));
            }
        }

        match args.data.get(self.source_field) {
            Some(Value::String(source)) if !source.is_empty() => Some(Value::String(slugify(source))),
            _ => value,
        }
    }
}

/// Lower-case, whitespace runs to `-`, drop anything outside `[a-z0-9-]`
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut in_whitespace = false;

    for c in input.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Actor;
    use crate::types::{Document, Operation};
    use serde_json::json;

    #[test]
    fn slugify_matches_url_rules() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
        assert_eq!(slugify("  Big   Bots  "), "-big-bots-");
        assert_eq!(slugify("Café & Co."), "caf--co");
        assert_eq!(slugify("already-ok-42"), "already-ok-42");
    }

    #[test]
    fn derives_from_name_when_slug_missing() {
        let actor = Actor::Anonymous;
        let data: Document = json!({ "name": "Magic Bot Ltd" }).as_object().cloned().unwrap();
        let args = HookArgs { actor: &actor, operation: Operation::Create, data: &data, original: None };

        let hook = SlugFromField::new("name");
        assert_eq!(hook.before_validate(None, &args), Some(json!("magic-bot-ltd")));
        assert_eq!(hook.before_validate(Some(json!("")), &args), Some(json!("magic-bot-ltd")));
        assert_eq!(hook.before_validate(Some(json!("Custom Slug")), &args), Some(json!("custom-slug")));
    }

    #[test]
    fn leaves_value_when_nothing_to_derive_from() {
        let actor = Actor::Anonymous;
        let data = Document::new();
        let args = HookArgs { actor: &actor, operation: Operation::Create, data: &data, original: None };
        assert_eq!(SlugFromField::new("name").before_validate(None, &args), None);
    }
}
