// Collection definitions: fields, admin metadata and the attached access policy

pub mod fields;

pub mod ai_bots;
pub mod ai_team_members;
pub mod clients;
pub mod invoices;
pub mod messages;
pub mod telegram_bots;
pub mod tenants;
pub mod users;

pub use fields::*;

use serde::{Serialize, Serializer};

use crate::access::{AccessArgs, AccessDecision, AccessPolicy, PublicRead};
use crate::auth::Actor;
use crate::config::AppConfig;
use crate::error::CmsError;
use crate::types::Operation;

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_as_title: Option<&'static str>,
    pub default_columns: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct CollectionConfig {
    pub slug: &'static str,
    /// Users of this collection can log in
    pub auth: bool,
    pub admin: AdminConfig,
    pub fields: Vec<Field>,
    #[serde(serialize_with = "policy_name")]
    pub access: Box<dyn AccessPolicy>,
}

fn policy_name<S: Serializer>(policy: &Box<dyn AccessPolicy>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(policy.name())
}

impl std::fmt::Debug for CollectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("slug", &self.slug)
            .field("fields", &self.fields.iter().map(|field| field.name).collect::<Vec<_>>())
            .field("access", &self.access.name())
            .finish()
    }
}

impl CollectionConfig {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn owner_field(&self) -> Option<&'static str> {
        self.access.owner_field()
    }

    pub fn evaluate(&self, operation: Operation, args: &AccessArgs<'_>) -> AccessDecision {
        self.access.evaluate(operation, args)
    }

    pub fn admin_visible(&self, actor: &Actor) -> bool {
        self.access.admin_visible(actor)
    }

    /// Swap the read predicate for an unconditional grant
    pub fn with_public_read(mut self) -> Self {
        self.access = Box::new(PublicRead::new(self.access));
        self
    }
}

/// Every collection the backend knows about, in admin navigation order
#[derive(Debug)]
pub struct CollectionRegistry {
    collections: Vec<CollectionConfig>,
}

impl CollectionRegistry {
    pub fn new(config: &AppConfig) -> Self {
        let collections = [
            users::collection(),
            clients::collection(),
            tenants::collection(),
            ai_bots::collection(),
            telegram_bots::collection(),
            messages::collection(),
            invoices::collection(),
            ai_team_members::collection(),
        ]
        .into_iter()
        .map(|collection| {
            if config.is_public_read(collection.slug) {
                tracing::info!("Collection {} opted into public read", collection.slug);
                collection.with_public_read()
            } else {
                collection
            }
        })
        .collect::<Vec<_>>();

        for slug in &config.access.public_read {
            if !collections.iter().any(|c| c.slug == slug.as_str()) {
                tracing::warn!("Public read configured for unknown collection '{}'", slug);
            }
        }

        Self { collections }
    }

    pub fn get(&self, slug: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.slug == slug)
    }

    pub fn require(&self, slug: &str) -> Result<&CollectionConfig, CmsError> {
        self.get(slug).ok_or_else(|| CmsError::unknown_collection(slug))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionConfig> {
        self.collections.iter()
    }

    pub fn slugs(&self) -> Vec<&'static str> {
        self.collections.iter().map(|c| c.slug).collect()
    }

    /// Collections shown in the admin navigation for `actor`
    pub fn visible_to(&self, actor: &Actor) -> Vec<&CollectionConfig> {
        self.collections.iter().filter(|c| c.admin_visible(actor)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    #[test]
    fn registry_holds_every_collection_once() {
        let registry = CollectionRegistry::new(&AppConfig::development());
        let mut slugs = registry.slugs();
        slugs.sort();
        assert_eq!(
            slugs,
            vec!["ai_bots", "ai_team_members", "clients", "invoices", "messages", "telegram_bots", "tenants", "users"]
        );
    }

    #[test]
    fn owner_fields_follow_policies() {
        let registry = CollectionRegistry::new(&AppConfig::development());
        assert_eq!(registry.get("ai_bots").and_then(|c| c.owner_field()), Some("linked_client"));
        assert_eq!(registry.get("invoices").and_then(|c| c.owner_field()), Some("client"));
        assert_eq!(registry.get("users").and_then(|c| c.owner_field()), Some("client"));
        assert_eq!(registry.get("tenants").and_then(|c| c.owner_field()), None);
    }

    #[test]
    fn public_read_comes_from_config() {
        let mut config = AppConfig::development();
        config.access.public_read = vec!["ai_bots".to_string()];
        let registry = CollectionRegistry::new(&config);

        let anonymous = Actor::Anonymous;
        let args = AccessArgs::new(&anonymous);
        assert!(registry.get("ai_bots").unwrap().evaluate(Operation::Read, &args).is_granted());
        assert!(registry.get("ai_bots").unwrap().evaluate(Operation::Create, &args).is_denied());
        assert!(registry.get("telegram_bots").unwrap().evaluate(Operation::Read, &args).is_denied());
    }

    #[test]
    fn admin_navigation_by_actor() {
        let registry = CollectionRegistry::new(&AppConfig::development());

        let admin: Actor = AuthUser::admin("a").into();
        assert_eq!(registry.visible_to(&admin).len(), 8);

        let client: Actor = AuthUser::client("u", "c").into();
        let mut visible: Vec<_> = registry.visible_to(&client).iter().map(|c| c.slug).collect();
        visible.sort();
        assert_eq!(visible, vec!["ai_bots", "invoices", "messages", "telegram_bots"]);

        assert!(registry.visible_to(&Actor::Anonymous).is_empty());
    }

    #[test]
    fn unknown_slug_is_an_error() {
        let registry = CollectionRegistry::new(&AppConfig::development());
        assert!(matches!(registry.require("widgets"), Err(CmsError::UnknownCollection(_))));
    }
}
