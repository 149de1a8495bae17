// Change pipeline: runs the stages for one operation against one collection

use serde_json::Value;

use crate::access::{AccessArgs, AccessDecision};
use crate::auth::Actor;
use crate::collections::{CollectionConfig, CollectionRegistry};
use crate::config::AppConfig;
use crate::error::CmsError;
use crate::filter::{Filter, FilterData};
use crate::pipeline::context::ChangeContext;
use crate::pipeline::stage::Stage;
use crate::pipeline::validate::validate_document;
use crate::types::{Document, Operation};

/// Fields the storage layer owns; never accepted from a payload
pub const SYSTEM_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

pub struct ChangePipeline {
    registry: CollectionRegistry,
    audit: bool,
}

impl ChangePipeline {
    pub fn new(registry: CollectionRegistry, config: &AppConfig) -> Self {
        Self {
            registry,
            audit: config.security.enable_audit_logging,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(CollectionRegistry::new(config), config)
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Sanitize and stamp a payload for insertion
    pub fn prepare_create(&self, slug: &str, actor: &Actor, data: Document) -> Result<Document, CmsError> {
        let collection = self.registry.require(slug)?;
        let ctx = ChangeContext::new(Operation::Create, collection, actor, data);
        let ctx = self.execute(ctx)?;
        Ok(ctx.data)
    }

    /// Sanitize and stamp a patch against the stored record
    ///
    /// Returns the patch to apply; the stored record is not modified.
    pub fn prepare_update(
        &self,
        slug: &str,
        actor: &Actor,
        id: &str,
        data: Document,
        original: &Document,
    ) -> Result<Document, CmsError> {
        let collection = self.registry.require(slug)?;
        let ctx = ChangeContext::new(Operation::Update, collection, actor, data).for_update(id, original);
        let ctx = self.execute(ctx)?;
        Ok(ctx.data)
    }

    /// Narrow a caller query to the rows the actor may read
    pub fn authorize_read(&self, slug: &str, actor: &Actor, query: FilterData) -> Result<FilterData, CmsError> {
        let collection = self.registry.require(slug)?;
        let decision = collection.evaluate(Operation::Read, &AccessArgs::new(actor));

        let mut filter = Filter::new(collection.slug)?;
        filter.assign(query)?;

        match decision {
            AccessDecision::Deny => Err(self.deny(collection, Operation::Read, actor)),
            AccessDecision::Grant => Ok(filter.to_filter_data()),
            AccessDecision::Filter(row_filter) => {
                filter.restrict(row_filter);
                Ok(filter.to_filter_data())
            }
        }
    }

    /// Check a delete against the stored record
    pub fn authorize_delete(&self, slug: &str, actor: &Actor, doc: &Document) -> Result<(), CmsError> {
        self.authorize_document(slug, Operation::Delete, actor, doc)
    }

    /// Check an operation against one loaded document
    ///
    /// A row outside the actor's filter reports `NotFound` so its existence
    /// is not revealed.
    pub fn authorize_document(
        &self,
        slug: &str,
        operation: Operation,
        actor: &Actor,
        doc: &Document,
    ) -> Result<(), CmsError> {
        let collection = self.registry.require(slug)?;
        let mut args = AccessArgs::new(actor).with_data(doc);
        let id = doc.get("id").and_then(crate::filter::row_filter::reference_key);
        if let Some(ref id) = id {
            args = args.with_id(id);
        }

        match collection.evaluate(operation, &args) {
            AccessDecision::Deny => Err(self.deny(collection, operation, actor)),
            AccessDecision::Grant => Ok(()),
            AccessDecision::Filter(row_filter) => {
                if row_filter.matches(doc) {
                    Ok(())
                } else {
                    tracing::warn!(
                        "{} on {} record {:?} outside {} for {}",
                        operation,
                        collection.slug,
                        id,
                        row_filter,
                        actor.describe()
                    );
                    Err(CmsError::not_found(format!("Record not found in {}", collection.slug)))
                }
            }
        }
    }

    fn execute<'a>(&self, mut ctx: ChangeContext<'a>) -> Result<ChangeContext<'a>, CmsError> {
        let stages = Stage::for_operation(ctx.operation);

        tracing::info!(
            "Change pipeline starting: operation={}, collection={}, actor={}, stages={:?}",
            ctx.operation,
            ctx.collection.slug,
            ctx.actor.describe(),
            stages
        );

        let mut decision = AccessDecision::Deny;
        for stage in stages {
            ctx.current_stage = Some(stage);
            match stage {
                Stage::Security => decision = self.security(&ctx)?,
                Stage::Preparation => self.preparation(&mut ctx),
                Stage::Enrichment => self.enrichment(&mut ctx, &decision)?,
                Stage::Validation => self.validation(&ctx)?,
            }
        }

        if self.audit && !ctx.dropped_fields.is_empty() {
            tracing::info!(
                "Audit: {} on {} by {} dropped fields {:?}",
                ctx.operation,
                ctx.collection.slug,
                ctx.actor.describe(),
                ctx.dropped_fields
            );
        }

        tracing::info!(
            "Change pipeline completed: operation={}, collection={}, time={:?}",
            ctx.operation,
            ctx.collection.slug,
            ctx.execution_time()
        );

        Ok(ctx)
    }

    fn security(&self, ctx: &ChangeContext<'_>) -> Result<AccessDecision, CmsError> {
        let decision = ctx.collection.evaluate(ctx.operation, &ctx.access_args());

        match &decision {
            AccessDecision::Deny => return Err(self.deny(ctx.collection, ctx.operation, ctx.actor)),
            AccessDecision::Grant => {}
            AccessDecision::Filter(row_filter) => {
                if let Some(original) = ctx.original {
                    if !row_filter.matches(original) {
                        tracing::warn!(
                            "{} of {} record {:?} outside {} for {}",
                            ctx.operation,
                            ctx.collection.slug,
                            ctx.id,
                            row_filter,
                            ctx.actor.describe()
                        );
                        return Err(self.deny(ctx.collection, ctx.operation, ctx.actor));
                    }
                }
            }
        }

        Ok(decision)
    }

    fn preparation(&self, ctx: &mut ChangeContext<'_>) {
        let collection = ctx.collection;

        for field in SYSTEM_FIELDS {
            if ctx.data.contains_key(field) {
                tracing::warn!("Ignoring system field '{}' in {} payload", field, collection.slug);
                ctx.drop_field(field);
            }
        }

        for field in &collection.fields {
            if ctx.data.contains_key(field.name) && field.read_only.applies_to(ctx.actor) {
                tracing::warn!(
                    "Dropping read-only field '{}' on {} for {}",
                    field.name,
                    collection.slug,
                    ctx.actor.describe()
                );
                ctx.drop_field(field.name);
            }
        }

        if !collection.auth {
            let unknown: Vec<String> = ctx
                .data
                .keys()
                .filter(|key| collection.field(key).is_none())
                .cloned()
                .collect();
            for key in unknown {
                tracing::debug!("Dropping unknown field '{}' on {}", key, collection.slug);
                ctx.drop_field(&key);
            }
        }

        for field in collection.fields.iter().filter(|field| !field.hooks.is_empty()) {
            let snapshot = ctx.data.clone();
            let mut value = ctx.data.get(field.name).cloned();
            for hook in &field.hooks {
                value = hook.before_validate(value, &ctx.hook_args(&snapshot));
            }
            set_or_remove(&mut ctx.data, field.name, value);
        }

        if ctx.operation == Operation::Create {
            for field in &collection.fields {
                if let Some(ref default) = field.default_value {
                    if ctx.data.get(field.name).map_or(true, Value::is_null) {
                        ctx.data.insert(field.name.to_string(), default.clone());
                    }
                }
            }
        }
    }

    fn enrichment(&self, ctx: &mut ChangeContext<'_>, decision: &AccessDecision) -> Result<(), CmsError> {
        let collection = ctx.collection;

        for field in collection.fields.iter().filter(|field| !field.hooks.is_empty()) {
            let snapshot = ctx.data.clone();
            let before = ctx.data.get(field.name).cloned();
            let mut value = before.clone();
            for hook in &field.hooks {
                value = hook.before_change(value, &ctx.hook_args(&snapshot));
            }
            if self.audit && value != before {
                tracing::info!(
                    "Audit: {} set {}.{} to {:?} for {}",
                    ctx.operation,
                    collection.slug,
                    field.name,
                    value,
                    ctx.actor.describe()
                );
            }
            set_or_remove(&mut ctx.data, field.name, value);
        }

        if let AccessDecision::Filter(row_filter) = decision {
            if !row_filter.matches(&ctx.merged()) {
                tracing::warn!(
                    "{} on {} would leave {} for {}",
                    ctx.operation,
                    collection.slug,
                    row_filter,
                    ctx.actor.describe()
                );
                return Err(self.deny(collection, ctx.operation, ctx.actor));
            }
        }

        Ok(())
    }

    fn validation(&self, ctx: &ChangeContext<'_>) -> Result<(), CmsError> {
        let field_errors = validate_document(ctx.collection, &ctx.merged());
        if field_errors.is_empty() {
            return Ok(());
        }

        tracing::warn!(
            "Validation failed for {} on {}: {:?}",
            ctx.operation,
            ctx.collection.slug,
            field_errors
        );
        Err(CmsError::validation_error("Validation failed", Some(field_errors)))
    }

    fn deny(&self, collection: &CollectionConfig, operation: Operation, actor: &Actor) -> CmsError {
        tracing::warn!(
            "Access denied: {} on {} for {}",
            operation,
            collection.slug,
            actor.describe()
        );
        if self.audit {
            tracing::info!(
                "Audit: denied {} on {} ({}) for {}",
                operation,
                collection.slug,
                collection.access.name(),
                actor.describe()
            );
        }
        CmsError::forbidden(format!("Not allowed to {} {}", operation, collection.slug))
    }
}

fn set_or_remove(data: &mut Document, field: &str, value: Option<Value>) {
    match value {
        Some(value) => {
            data.insert(field.to_string(), value);
        }
        None => {
            data.remove(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn pipeline() -> ChangePipeline {
        ChangePipeline::from_config(&AppConfig::development())
    }

    #[test]
    fn client_create_is_stamped_and_defaulted() {
        let client: Actor = AuthUser::client("u-1", "c-1").into();
        let stored = pipeline()
            .prepare_create(
                "invoices",
                &client,
                doc(json!({ "id": "forged", "client": "c-2", "amount": 10, "bogus": 1 })),
            )
            .unwrap();

        assert_eq!(stored.get("client"), Some(&json!("c-1")));
        assert_eq!(stored.get("status"), Some(&json!("pending")));
        assert!(!stored.contains_key("id"));
        assert!(!stored.contains_key("bogus"));
    }

    #[test]
    fn anonymous_create_is_forbidden() {
        let err = pipeline()
            .prepare_create("invoices", &Actor::Anonymous, doc(json!({ "amount": 1 })))
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn update_of_other_clients_record_is_forbidden() {
        let client: Actor = AuthUser::client("u-1", "c-1").into();
        let original = doc(json!({ "id": "b-9", "bot_name": "Other", "linked_client": "c-2" }));
        let err = pipeline()
            .prepare_update("ai_bots", &client, "b-9", doc(json!({ "bot_name": "Mine" })), &original)
            .unwrap_err();
        assert!(matches!(err, CmsError::Forbidden(_)));
    }

    #[test]
    fn validation_reports_merged_record() {
        let admin: Actor = AuthUser::admin("a-1").into();
        let err = pipeline()
            .prepare_create("invoices", &admin, doc(json!({ "amount": "ten" })))
            .unwrap_err();
        match err {
            CmsError::ValidationError { field_errors: Some(errors), .. } => {
                assert!(errors.contains_key("client"));
                assert!(errors.contains_key("amount"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn read_filter_is_folded_into_query() {
        let client: Actor = AuthUser::client("u-1", "c-1").into();
        let query = pipeline().authorize_read("messages", &client, FilterData::default()).unwrap();
        assert_eq!(query.where_clause, Some(json!({ "client": { "$eq": "c-1" } })));
    }

    #[test]
    fn delete_outside_filter_is_not_found() {
        let client: Actor = AuthUser::client("u-1", "c-1").into();
        let foreign = doc(json!({ "id": "i-1", "client": "c-2" }));
        let own = doc(json!({ "id": "i-2", "client": "c-1" }));

        assert!(matches!(
            pipeline().authorize_delete("invoices", &client, &foreign),
            Err(CmsError::NotFound(_))
        ));
        assert!(pipeline().authorize_delete("invoices", &client, &own).is_ok());
    }
}
