use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

use crate::auth::Actor;
use crate::hooks::FieldHook;

/// Picker shown for date fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePicker {
    DayOnly,
    DayAndTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

impl SelectOption {
    pub const fn new(label: &'static str, value: &'static str) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Email,
    Number,
    Checkbox,
    Json,
    Date { picker: DatePicker },
    Select { options: Vec<SelectOption> },
    Relationship { relation_to: &'static str, has_many: bool },
}

/// Who sees a field as read-only; read-only payload values are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadOnly {
    #[default]
    Never,
    ForNonAdmins,
    ForLinkedClients,
    ForAnonymousAndClients,
}

impl ReadOnly {
    pub fn applies_to(&self, actor: &Actor) -> bool {
        match self {
            ReadOnly::Never => false,
            ReadOnly::ForNonAdmins => !actor.is_admin(),
            ReadOnly::ForLinkedClients => actor.tenant_client_id().is_some(),
            ReadOnly::ForAnonymousAndClients => {
                !actor.is_authenticated() || actor.role() == Some(crate::types::Role::Client)
            }
        }
    }
}

#[derive(Clone, Serialize)]
pub struct Field {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub label: Option<&'static str>,
    pub required: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "is_never")]
    pub read_only: ReadOnly,
    /// Shown in the admin sidebar rather than the main column
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sidebar: bool,
    #[serde(serialize_with = "hook_names", skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<Arc<dyn FieldHook>>,
}

fn is_never(read_only: &ReadOnly) -> bool {
    *read_only == ReadOnly::Never
}

fn hook_names<S: Serializer>(hooks: &[Arc<dyn FieldHook>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(hooks.iter().map(|hook| hook.name()))
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("read_only", &self.read_only)
            .field("hooks", &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl Field {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            label: None,
            required: false,
            unique: false,
            default_value: None,
            description: None,
            read_only: ReadOnly::Never,
            sidebar: false,
            hooks: Vec::new(),
        }
    }

    pub fn text(name: &'static str) -> Self { Self::new(name, FieldKind::Text) }

    pub fn textarea(name: &'static str) -> Self { Self::new(name, FieldKind::Textarea) }

    pub fn email(name: &'static str) -> Self { Self::new(name, FieldKind::Email) }

    pub fn number(name: &'static str) -> Self { Self::new(name, FieldKind::Number) }

    pub fn checkbox(name: &'static str) -> Self { Self::new(name, FieldKind::Checkbox) }

    pub fn json(name: &'static str) -> Self { Self::new(name, FieldKind::Json) }

    pub fn date(name: &'static str, picker: DatePicker) -> Self {
        Self::new(name, FieldKind::Date { picker })
    }

    pub fn select(name: &'static str, options: &[SelectOption]) -> Self {
        Self::new(name, FieldKind::Select { options: options.to_vec() })
    }

    pub fn relationship(name: &'static str, relation_to: &'static str) -> Self {
        Self::new(name, FieldKind::Relationship { relation_to, has_many: false })
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn read_only(mut self, read_only: ReadOnly) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn sidebar(mut self) -> Self {
        self.sidebar = true;
        self
    }

    pub fn hook(mut self, hook: impl FieldHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Allowed values of a select field
    pub fn option_values(&self) -> Option<Vec<&'static str>> {
        match &self.kind {
            FieldKind::Select { options } => Some(options.iter().map(|o| o.value).collect()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use serde_json::json;

    #[test]
    fn read_only_rules() {
        let admin: Actor = AuthUser::admin("a").into();
        let client: Actor = AuthUser::client("u", "c").into();
        let unlinked: Actor = AuthUser { client: None, ..AuthUser::client("u", "c") }.into();
        let anonymous = Actor::Anonymous;

        assert!(!ReadOnly::ForNonAdmins.applies_to(&admin));
        assert!(ReadOnly::ForNonAdmins.applies_to(&client));
        assert!(ReadOnly::ForNonAdmins.applies_to(&anonymous));

        assert!(ReadOnly::ForLinkedClients.applies_to(&client));
        assert!(!ReadOnly::ForLinkedClients.applies_to(&unlinked));
        assert!(!ReadOnly::ForLinkedClients.applies_to(&admin));

        assert!(ReadOnly::ForAnonymousAndClients.applies_to(&anonymous));
        assert!(ReadOnly::ForAnonymousAndClients.applies_to(&unlinked));
        assert!(!ReadOnly::ForAnonymousAndClients.applies_to(&admin));
    }

    #[test]
    fn field_serializes_with_type_tag() {
        let field = Field::relationship("linked_client", "clients").label("Linked Client").required();
        let value = serde_json::to_value(&field).unwrap();

        assert_eq!(value["name"], json!("linked_client"));
        assert_eq!(value["type"], json!("relationship"));
        assert_eq!(value["relation_to"], json!("clients"));
        assert_eq!(value["required"], json!(true));
        assert!(value.get("hooks").is_none());
    }
}
