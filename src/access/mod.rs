// Row-level access control attached per collection

pub mod policies;

pub use policies::*;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::auth::Actor;
use crate::filter::RowFilter;
use crate::types::{Document, Operation};

/// Outcome of an access predicate
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// Full grant
    Grant,
    /// Full deny
    Deny,
    /// Grant restricted to rows matching the filter
    Filter(RowFilter),
}

impl AccessDecision {
    pub fn from_bool(granted: bool) -> Self {
        if granted { AccessDecision::Grant } else { AccessDecision::Deny }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Deny)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Grant)
    }

    /// Whether a specific loaded document falls inside this decision
    pub fn permits(&self, doc: &Document) -> bool {
        match self {
            AccessDecision::Grant => true,
            AccessDecision::Deny => false,
            AccessDecision::Filter(filter) => filter.matches(doc),
        }
    }

    /// `true`, `false`, or the where-clause object
    pub fn to_json(&self) -> Value {
        match self {
            AccessDecision::Grant => Value::Bool(true),
            AccessDecision::Deny => Value::Bool(false),
            AccessDecision::Filter(filter) => filter.to_where(),
        }
    }
}

impl Serialize for AccessDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Arguments a host passes to an access predicate
#[derive(Debug, Clone, Copy)]
pub struct AccessArgs<'a> {
    pub actor: &'a Actor,
    /// Target record id for single-document operations
    pub id: Option<&'a str>,
    /// Incoming payload for create/update
    pub data: Option<&'a Document>,
}

impl<'a> AccessArgs<'a> {
    pub fn new(actor: &'a Actor) -> Self {
        Self { actor, id: None, data: None }
    }

    pub fn with_id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_data(mut self, data: &'a Document) -> Self {
        self.data = Some(data);
        self
    }

    /// Explicit id, else the payload's `id`
    pub fn target_id(&self) -> Option<String> {
        if let Some(id) = self.id {
            return Some(id.to_string());
        }
        self.data
            .and_then(|data| data.get("id"))
            .and_then(crate::filter::row_filter::reference_key)
    }
}

/// One predicate per operation, implemented per policy kind
///
/// Predicates never fail: anything a policy does not explicitly allow is
/// denied.
pub trait AccessPolicy: Send + Sync {
    /// Policy name for logging and introspection
    fn name(&self) -> &'static str;

    fn read(&self, args: &AccessArgs<'_>) -> AccessDecision;

    fn create(&self, args: &AccessArgs<'_>) -> AccessDecision;

    fn update(&self, args: &AccessArgs<'_>) -> AccessDecision;

    fn delete(&self, args: &AccessArgs<'_>) -> AccessDecision;

    /// Whether the collection shows up in the admin navigation
    fn admin_visible(&self, actor: &Actor) -> bool {
        actor.is_admin()
    }

    /// Document field holding the owning client, if the collection is tenant-scoped
    fn owner_field(&self) -> Option<&'static str> {
        None
    }

    fn evaluate(&self, operation: Operation, args: &AccessArgs<'_>) -> AccessDecision {
        let decision = match operation {
            Operation::Read => self.read(args),
            Operation::Create => self.create(args),
            Operation::Update => self.update(args),
            Operation::Delete => self.delete(args),
        };

        tracing::debug!(
            "Access {} via {} for {}: {}",
            operation,
            self.name(),
            args.actor.describe(),
            decision.to_json()
        );

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decision_serializes_as_bool_or_where() {
        assert_eq!(serde_json::to_value(AccessDecision::Grant).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(AccessDecision::Deny).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(AccessDecision::Filter(RowFilter::equals("client", "c-1"))).unwrap(),
            json!({ "client": { "$eq": "c-1" } })
        );
    }

    #[test]
    fn target_id_falls_back_to_payload() {
        let actor = Actor::Anonymous;
        let data = json!({ "id": 7 }).as_object().cloned().unwrap();

        assert_eq!(AccessArgs::new(&actor).with_id("u-1").target_id().as_deref(), Some("u-1"));
        assert_eq!(AccessArgs::new(&actor).with_data(&data).target_id().as_deref(), Some("7"));
        assert_eq!(AccessArgs::new(&actor).target_id(), None);
    }
}
