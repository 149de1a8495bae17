use std::time::Instant;

use crate::access::AccessArgs;
use crate::auth::Actor;
use crate::collections::CollectionConfig;
use crate::hooks::HookArgs;
use crate::pipeline::stage::Stage;
use crate::types::{Document, Operation};

/// Request-scoped state that flows through the change pipeline
#[derive(Debug)]
pub struct ChangeContext<'a> {
    pub operation: Operation,
    pub collection: &'a CollectionConfig,
    pub actor: &'a Actor,

    /// Target record id for updates
    pub id: Option<String>,

    /// Working payload, rewritten by each stage
    pub data: Document,

    /// Stored record for updates
    pub original: Option<&'a Document>,

    /// Payload fields discarded before hooks ran
    pub dropped_fields: Vec<String>,

    pub start_time: Instant,
    pub current_stage: Option<Stage>,
}

impl<'a> ChangeContext<'a> {
    pub fn new(
        operation: Operation,
        collection: &'a CollectionConfig,
        actor: &'a Actor,
        data: Document,
    ) -> Self {
        Self {
            operation,
            collection,
            actor,
            id: None,
            data,
            original: None,
            dropped_fields: Vec::new(),
            start_time: Instant::now(),
            current_stage: None,
        }
    }

    pub fn for_update(mut self, id: impl Into<String>, original: &'a Document) -> Self {
        self.id = Some(id.into());
        self.original = Some(original);
        self
    }

    pub fn access_args(&self) -> AccessArgs<'_> {
        let mut args = AccessArgs::new(self.actor).with_data(&self.data);
        if let Some(ref id) = self.id {
            args = args.with_id(id);
        }
        args
    }

    /// Hook arguments over a snapshot of the payload
    pub fn hook_args<'s>(&'s self, snapshot: &'s Document) -> HookArgs<'s> {
        HookArgs {
            actor: self.actor,
            operation: self.operation,
            data: snapshot,
            original: self.original,
        }
    }

    /// Stored record overlaid with the working payload
    pub fn merged(&self) -> Document {
        let mut merged = self.original.cloned().unwrap_or_default();
        for (key, value) in &self.data {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn drop_field(&mut self, field: &str) {
        if self.data.remove(field).is_some() {
            self.dropped_fields.push(field.to_string());
        }
    }

    pub fn execution_time(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
