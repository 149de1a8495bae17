use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::auth::{Actor, AuthUser, ClientRef, ClientSummary};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LookupError {
    #[error("Client lookup failed: {0}")]
    Backend(String),

    #[error("Client lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves a client id to its denormalized summary
#[async_trait]
pub trait ClientLookup: Send + Sync {
    async fn find_client(&self, id: &str) -> Result<Option<ClientSummary>, LookupError>;
}

/// Fixed set of clients, keyed by id
#[derive(Debug, Default, Clone)]
pub struct StaticClients {
    clients: HashMap<String, ClientSummary>,
}

impl StaticClients {
    pub fn new(clients: impl IntoIterator<Item = ClientSummary>) -> Self {
        Self {
            clients: clients.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }
}

#[async_trait]
impl ClientLookup for StaticClients {
    async fn find_client(&self, id: &str) -> Result<Option<ClientSummary>, LookupError> {
        Ok(self.clients.get(id).cloned())
    }
}

/// Post-login hook that populates the session's client reference
pub struct PopulateSessionClient {
    lookup: Arc<dyn ClientLookup>,
    timeout: Duration,
}

impl PopulateSessionClient {
    pub fn new(lookup: Arc<dyn ClientLookup>, timeout: Duration) -> Self {
        Self { lookup, timeout }
    }

    pub fn from_config(lookup: Arc<dyn ClientLookup>, config: &crate::config::AppConfig) -> Self {
        Self::new(lookup, Duration::from_millis(config.login.client_lookup_timeout_ms))
    }

    /// Resolve a bare client id on `user` and attach `{ id, name }` to the
    /// session identity
    ///
    /// Never fails: lookup errors are logged and the session keeps the
    /// unresolved id. `user` is returned unchanged.
    pub async fn after_login(&self, session: &mut Actor, user: AuthUser) -> AuthUser {
        let client_id = match &user.client {
            Some(ClientRef::Id(id)) if !id.is_empty() => id.clone(),
            _ => return user,
        };

        match self.resolve(&client_id).await {
            Ok(Some(client)) => match session.user_mut() {
                Some(session_user) => {
                    tracing::debug!("Populated client {} for user {}", client.id, user.id);
                    session_user.client = Some(ClientRef::Populated(ClientSummary {
                        id: client.id,
                        name: client.name,
                        slug: None,
                    }));
                }
                None => {
                    tracing::debug!("No session identity to populate for user {}", user.id);
                }
            },
            Ok(None) => {
                tracing::warn!("Client {} for user {} not found", client_id, user.id);
            }
            Err(error) => {
                tracing::error!("Error populating client for user {}: {}", user.id, error);
            }
        }

        user
    }

    async fn resolve(&self, client_id: &str) -> Result<Option<ClientSummary>, LookupError> {
        match timeout(self.timeout, self.lookup.find_client(client_id)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(LookupError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLookup;

    #[async_trait]
    impl ClientLookup for FailingLookup {
        async fn find_client(&self, _id: &str) -> Result<Option<ClientSummary>, LookupError> {
            Err(LookupError::Backend("connection refused".to_string()))
        }
    }

    struct SlowLookup;

    #[async_trait]
    impl ClientLookup for SlowLookup {
        async fn find_client(&self, id: &str) -> Result<Option<ClientSummary>, LookupError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Some(ClientSummary { id: id.to_string(), name: "late".into(), slug: None }))
        }
    }

    fn acme() -> ClientSummary {
        ClientSummary { id: "c-1".into(), name: "Acme".into(), slug: Some("acme".into()) }
    }

    fn hook(lookup: Arc<dyn ClientLookup>) -> PopulateSessionClient {
        PopulateSessionClient::new(lookup, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn populates_session_with_id_and_name() {
        let user = AuthUser::client("u-1", "c-1");
        let mut session = Actor::from(user.clone());

        let returned = hook(Arc::new(StaticClients::new([acme()])))
            .after_login(&mut session, user.clone())
            .await;

        assert_eq!(returned, user);
        assert_eq!(
            session.user().and_then(|u| u.client.clone()),
            Some(ClientRef::Populated(ClientSummary { id: "c-1".into(), name: "Acme".into(), slug: None }))
        );
    }

    #[tokio::test]
    async fn lookup_error_leaves_session_unresolved() {
        let user = AuthUser::client("u-1", "c-1");
        let mut session = Actor::from(user.clone());

        let returned = hook(Arc::new(FailingLookup)).after_login(&mut session, user.clone()).await;

        assert_eq!(returned, user);
        assert_eq!(session, Actor::from(user));
    }

    #[tokio::test]
    async fn slow_lookup_times_out_without_blocking_login() {
        let user = AuthUser::client("u-1", "c-1");
        let mut session = Actor::from(user.clone());

        let returned = hook(Arc::new(SlowLookup)).after_login(&mut session, user.clone()).await;

        assert_eq!(returned, user);
        assert_eq!(session.user().and_then(|u| u.client_id()), Some("c-1"));
        assert!(!session.user().and_then(|u| u.client.as_ref()).map(ClientRef::is_populated).unwrap_or(true));
    }

    #[tokio::test]
    async fn already_populated_client_is_left_alone() {
        let user = AuthUser { client: Some(ClientRef::Populated(acme())), ..AuthUser::admin("a-1") };
        let mut session = Actor::from(user.clone());

        let returned = hook(Arc::new(FailingLookup)).after_login(&mut session, user.clone()).await;

        assert_eq!(returned, user);
        assert_eq!(session, Actor::from(user));
    }

    #[tokio::test]
    async fn unknown_client_keeps_bare_id() {
        let user = AuthUser::client("u-1", "c-404");
        let mut session = Actor::from(user.clone());

        hook(Arc::new(StaticClients::default())).after_login(&mut session, user.clone()).await;

        assert_eq!(session, Actor::from(user));
    }
}
