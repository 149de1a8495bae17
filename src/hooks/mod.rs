// Field and collection hooks run by the change pipeline and after login

pub mod after_login;
pub mod slug;
pub mod tenant_stamp;

pub use after_login::*;
pub use slug::*;
pub use tenant_stamp::*;

use serde_json::Value;

use crate::auth::Actor;
use crate::types::{Document, Operation};

/// Request-scoped arguments handed to a field hook
#[derive(Debug, Clone, Copy)]
pub struct HookArgs<'a> {
    pub actor: &'a Actor,
    pub operation: Operation,
    /// Incoming payload as seen so far by the pipeline
    pub data: &'a Document,
    /// Stored record for updates
    pub original: Option<&'a Document>,
}

/// Field-level hook; `None` means the field is absent from the payload
///
/// Each phase returns the value to store, which may be the input unchanged.
pub trait FieldHook: Send + Sync {
    fn name(&self) -> &'static str;

    fn before_validate(&self, value: Option<Value>, _args: &HookArgs<'_>) -> Option<Value> {
        value
    }

    fn before_change(&self, value: Option<Value>, _args: &HookArgs<'_>) -> Option<Value> {
        value
    }
}
