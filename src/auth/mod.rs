use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Denormalized client attached to a session after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// A user's owning client: a bare identifier until login populates it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientRef {
    Id(String),
    Populated(ClientSummary),
}

impl ClientRef {
    pub fn id(&self) -> &str {
        match self {
            ClientRef::Id(id) => id,
            ClientRef::Populated(summary) => &summary.id,
        }
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, ClientRef::Populated(_))
    }
}

impl From<ClientSummary> for ClientRef {
    fn from(summary: ClientSummary) -> Self {
        ClientRef::Populated(summary)
    }
}

/// Authenticated user as the host hands it to predicates and hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
}

impl AuthUser {
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: String::new(),
            role: Role::Admin,
            client: None,
        }
    }

    pub fn client(id: impl Into<String>, client: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: String::new(),
            role: Role::Client,
            client: Some(ClientRef::Id(client.into())),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Owning client id; an empty reference counts as no client
    pub fn client_id(&self) -> Option<&str> {
        self.client.as_ref().map(ClientRef::id).filter(|id| !id.is_empty())
    }
}

/// The acting identity of a single request, passed explicitly to every check
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User(AuthUser),
}

impl Actor {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Actor::User(user) => Some(user),
            Actor::Anonymous => None,
        }
    }

    pub fn user_mut(&mut self) -> Option<&mut AuthUser> {
        match self {
            Actor::User(user) => Some(user),
            Actor::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|user| user.id.as_str())
    }

    /// Owning client of a client-role actor; `None` for admins, anonymous
    /// actors and client users with no linked client
    pub fn tenant_client_id(&self) -> Option<&str> {
        match self.user() {
            Some(user) if user.role == Role::Client => user.client_id(),
            _ => None,
        }
    }

    /// Short label for log lines
    pub fn describe(&self) -> String {
        match self {
            Actor::Anonymous => "anonymous".to_string(),
            Actor::User(user) => match user.client_id() {
                Some(client) => format!("{}:{} (client {})", user.role, user.id, client),
                None => format!("{}:{}", user.role, user.id),
            },
        }
    }
}

impl From<AuthUser> for Actor {
    fn from(user: AuthUser) -> Self {
        Actor::User(user)
    }
}
