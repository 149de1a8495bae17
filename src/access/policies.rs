use super::{AccessArgs, AccessDecision, AccessPolicy};
use crate::auth::Actor;
use crate::filter::RowFilter;
use crate::types::Role;

/// Only admins may do anything
#[derive(Debug, Default, Clone, Copy)]
pub struct AdminOnly;

impl AccessPolicy for AdminOnly {
    fn name(&self) -> &'static str { "AdminOnly" }

    fn read(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AccessDecision::from_bool(args.actor.is_admin())
    }

    fn create(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AccessDecision::from_bool(args.actor.is_admin())
    }

    fn update(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AccessDecision::from_bool(args.actor.is_admin())
    }

    fn delete(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AccessDecision::from_bool(args.actor.is_admin())
    }
}

/// Records owned by a client through `owner_field`
///
/// Admins are unrestricted. Client users with a linked client may create,
/// and may read/update/delete only rows owned by their client.
#[derive(Debug, Clone, Copy)]
pub struct TenantScoped {
    pub owner_field: &'static str,
}

impl TenantScoped {
    pub const fn new(owner_field: &'static str) -> Self {
        Self { owner_field }
    }

    fn scoped(&self, actor: &Actor) -> AccessDecision {
        if actor.is_admin() {
            return AccessDecision::Grant;
        }
        match actor.tenant_client_id() {
            Some(client_id) => AccessDecision::Filter(RowFilter::equals(self.owner_field, client_id)),
            None => AccessDecision::Deny,
        }
    }
}

impl AccessPolicy for TenantScoped {
    fn name(&self) -> &'static str { "TenantScoped" }

    fn read(&self, args: &AccessArgs<'_>) -> AccessDecision {
        self.scoped(args.actor)
    }

    fn create(&self, args: &AccessArgs<'_>) -> AccessDecision {
        // Client creations are stamped with the actor's client by the owner hook
        AccessDecision::from_bool(args.actor.is_admin() || args.actor.tenant_client_id().is_some())
    }

    fn update(&self, args: &AccessArgs<'_>) -> AccessDecision {
        self.scoped(args.actor)
    }

    fn delete(&self, args: &AccessArgs<'_>) -> AccessDecision {
        self.scoped(args.actor)
    }

    fn admin_visible(&self, actor: &Actor) -> bool {
        actor.is_admin() || actor.tenant_client_id().is_some()
    }

    fn owner_field(&self) -> Option<&'static str> {
        Some(self.owner_field)
    }
}

/// The client (tenant) records themselves
///
/// Client users see only their own client row; every write is admin-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnClientRecord;

impl AccessPolicy for OwnClientRecord {
    fn name(&self) -> &'static str { "OwnClientRecord" }

    fn read(&self, args: &AccessArgs<'_>) -> AccessDecision {
        if args.actor.is_admin() {
            return AccessDecision::Grant;
        }
        match args.actor.tenant_client_id() {
            Some(client_id) => AccessDecision::Filter(RowFilter::equals("id", client_id)),
            None => AccessDecision::Deny,
        }
    }

    fn create(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AdminOnly.create(args)
    }

    fn update(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AdminOnly.update(args)
    }

    fn delete(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AdminOnly.delete(args)
    }

    fn owner_field(&self) -> Option<&'static str> {
        Some("id")
    }
}

/// User accounts
///
/// Client users read themselves and the other users of their client, and
/// update only their own record.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserAccounts;

impl AccessPolicy for UserAccounts {
    fn name(&self) -> &'static str { "UserAccounts" }

    fn read(&self, args: &AccessArgs<'_>) -> AccessDecision {
        if args.actor.is_admin() {
            return AccessDecision::Grant;
        }
        match (args.actor.user_id(), args.actor.tenant_client_id()) {
            (Some(user_id), Some(client_id)) => AccessDecision::Filter(RowFilter::or([
                RowFilter::equals("id", user_id),
                RowFilter::equals("client", client_id),
            ])),
            _ => AccessDecision::Deny,
        }
    }

    fn create(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AdminOnly.create(args)
    }

    fn update(&self, args: &AccessArgs<'_>) -> AccessDecision {
        let user = match args.actor.user() {
            Some(user) => user,
            None => return AccessDecision::Deny,
        };

        match user.role {
            Role::Admin => AccessDecision::Grant,
            Role::Client => {
                let own_record = args.target_id().map(|target| target == user.id).unwrap_or(false);
                if !own_record {
                    tracing::warn!(
                        "User {} attempted to update user record {:?}",
                        user.id,
                        args.target_id()
                    );
                }
                AccessDecision::from_bool(own_record)
            }
        }
    }

    fn delete(&self, args: &AccessArgs<'_>) -> AccessDecision {
        AdminOnly.delete(args)
    }

    fn owner_field(&self) -> Option<&'static str> {
        Some("client")
    }
}

/// Opens read to everyone, anonymous included; other operations are delegated
pub struct PublicRead {
    inner: Box<dyn AccessPolicy>,
}

impl PublicRead {
    pub fn new(inner: Box<dyn AccessPolicy>) -> Self {
        Self { inner }
    }
}

impl AccessPolicy for PublicRead {
    fn name(&self) -> &'static str { "PublicRead" }

    fn read(&self, _args: &AccessArgs<'_>) -> AccessDecision {
        AccessDecision::Grant
    }

    fn create(&self, args: &AccessArgs<'_>) -> AccessDecision {
        self.inner.create(args)
    }

    fn update(&self, args: &AccessArgs<'_>) -> AccessDecision {
        self.inner.update(args)
    }

    fn delete(&self, args: &AccessArgs<'_>) -> AccessDecision {
        self.inner.delete(args)
    }

    fn admin_visible(&self, actor: &Actor) -> bool {
        self.inner.admin_visible(actor)
    }

    fn owner_field(&self) -> Option<&'static str> {
        self.inner.owner_field()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthUser, ClientRef, ClientSummary};
    use crate::types::Operation;
    use serde_json::json;

    fn admin() -> Actor {
        AuthUser::admin("admin-1").into()
    }

    fn client(user: &str, client: &str) -> Actor {
        AuthUser::client(user, client).into()
    }

    fn unlinked_client(user: &str) -> Actor {
        AuthUser { client: None, ..AuthUser::client(user, "") }.into()
    }

    #[test]
    fn admin_only_denies_everyone_else() {
        for op in Operation::ALL {
            assert!(AdminOnly.evaluate(op, &AccessArgs::new(&admin())).is_granted());
            assert!(AdminOnly.evaluate(op, &AccessArgs::new(&client("u-1", "c-1"))).is_denied());
            assert!(AdminOnly.evaluate(op, &AccessArgs::new(&Actor::Anonymous)).is_denied());
        }
    }

    #[test]
    fn tenant_scoped_filters_client_by_owner_field() {
        let policy = TenantScoped::new("linked_client");
        let actor = client("u-1", "c-1");
        let args = AccessArgs::new(&actor);

        let expected = AccessDecision::Filter(RowFilter::equals("linked_client", "c-1"));
        assert_eq!(policy.read(&args), expected);
        assert_eq!(policy.update(&args), expected);
        assert_eq!(policy.delete(&args), expected);
        assert!(policy.create(&args).is_granted());
    }

    #[test]
    fn tenant_scoped_uses_populated_client_id() {
        let policy = TenantScoped::new("linked_client");
        let actor: Actor = AuthUser {
            client: Some(ClientRef::Populated(ClientSummary {
                id: "c-9".into(),
                name: "Initech".into(),
                slug: None,
            })),
            ..AuthUser::client("u-1", "ignored")
        }
        .into();

        assert_eq!(
            policy.read(&AccessArgs::new(&actor)).to_json(),
            json!({ "linked_client": { "$eq": "c-9" } })
        );
    }

    #[test]
    fn tenant_scoped_denies_client_without_client() {
        let policy = TenantScoped::new("client");
        let actor = unlinked_client("u-1");
        for op in Operation::ALL {
            assert!(policy.evaluate(op, &AccessArgs::new(&actor)).is_denied());
        }
        assert!(!policy.admin_visible(&actor));
    }

    #[test]
    fn own_client_record_reads_only_itself() {
        let actor = client("u-1", "c-1");
        assert_eq!(
            OwnClientRecord.read(&AccessArgs::new(&actor)),
            AccessDecision::Filter(RowFilter::equals("id", "c-1"))
        );
        assert!(OwnClientRecord.update(&AccessArgs::new(&actor)).is_denied());
        assert!(OwnClientRecord.read(&AccessArgs::new(&Actor::Anonymous)).is_denied());
    }

    #[test]
    fn user_accounts_update_requires_own_id() {
        let actor = client("u-1", "c-1");
        assert!(UserAccounts.update(&AccessArgs::new(&actor).with_id("u-1")).is_granted());
        assert!(UserAccounts.update(&AccessArgs::new(&actor).with_id("u-2")).is_denied());
        assert!(UserAccounts.update(&AccessArgs::new(&actor)).is_denied());

        // A client user without a linked client may still edit themselves
        let unlinked = unlinked_client("u-3");
        assert!(UserAccounts.update(&AccessArgs::new(&unlinked).with_id("u-3")).is_granted());
    }

    #[test]
    fn user_accounts_read_is_self_or_same_client() {
        let actor = client("u-1", "c-1");
        let decision = UserAccounts.read(&AccessArgs::new(&actor));

        let own = json!({ "id": "u-1", "client": "c-other" }).as_object().cloned().unwrap();
        let colleague = json!({ "id": "u-2", "client": "c-1" }).as_object().cloned().unwrap();
        let stranger = json!({ "id": "u-3", "client": "c-2" }).as_object().cloned().unwrap();

        assert!(decision.permits(&own));
        assert!(decision.permits(&colleague));
        assert!(!decision.permits(&stranger));
    }

    #[test]
    fn public_read_opens_read_only() {
        let policy = PublicRead::new(Box::new(TenantScoped::new("linked_client")));
        let anonymous = Actor::Anonymous;
        assert!(policy.read(&AccessArgs::new(&anonymous)).is_granted());
        assert!(policy.create(&AccessArgs::new(&anonymous)).is_denied());
        assert!(policy.update(&AccessArgs::new(&anonymous)).is_denied());
        assert_eq!(policy.owner_field(), Some("linked_client"));
    }
}
