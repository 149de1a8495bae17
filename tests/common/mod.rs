#![allow(dead_code)]

use std::sync::Once;

use magicbot_cms::auth::{Actor, AuthUser};
use magicbot_cms::config::AppConfig;
use magicbot_cms::types::Document;
use magicbot_cms::ChangePipeline;
use serde_json::Value;

static TRACING: Once = Once::new();

/// Route library logs to the test writer; filter with RUST_LOG
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn pipeline() -> ChangePipeline {
    init_tracing();
    ChangePipeline::from_config(&AppConfig::development())
}

pub fn admin() -> Actor {
    AuthUser::admin("admin-1").with_email("ops@magicbot.test").into()
}

/// Client user `user_id` linked to client `client_id`
pub fn client_user(user_id: &str, client_id: &str) -> Actor {
    AuthUser::client(user_id, client_id).into()
}

/// Client user with no linked client
pub fn unlinked_client(user_id: &str) -> Actor {
    AuthUser { client: None, ..AuthUser::client(user_id, "") }.into()
}

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
