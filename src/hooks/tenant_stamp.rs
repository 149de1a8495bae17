use serde_json::Value;

use super::{FieldHook, HookArgs};
use crate::types::Role;

/// Owning-client hook for tenant-scoped fields
///
/// Admins keep whatever client they supplied. A client user always gets
/// their own client written, whatever the payload carried.
#[derive(Debug, Default, Clone, Copy)]
pub struct StampOwningClient;

impl FieldHook for StampOwningClient {
    fn name(&self) -> &'static str {
        "StampOwningClient"
    }

    fn before_change(&self, value: Option<Value>, args: &HookArgs<'_>) -> Option<Value> {
        if !args.operation.is_change() {
            return value;
        }

        match args.actor.role() {
            Some(Role::Admin) => value,
            Some(Role::Client) => match args.actor.tenant_client_id() {
                Some(client_id) => {
                    let stamped = Value::String(client_id.to_string());
                    if value.as_ref().is_some_and(|supplied| supplied != &stamped) {
                        tracing::warn!(
                            "Overriding supplied owning client {:?} with {} for {}",
                            value,
                            client_id,
                            args.actor.describe()
                        );
                    }
                    Some(stamped)
                }
                None => value,
            },
            None => value,
        }
    }
}
