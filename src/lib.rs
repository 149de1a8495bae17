pub mod access;
pub mod auth;
pub mod cli;
pub mod collections;
pub mod config;
pub mod error;
pub mod filter;
pub mod hooks;
pub mod pipeline;
pub mod types;

pub use access::{AccessArgs, AccessDecision, AccessPolicy};
pub use auth::{Actor, AuthUser, ClientRef, ClientSummary};
pub use collections::{CollectionConfig, CollectionRegistry};
pub use error::CmsError;
pub use pipeline::ChangePipeline;
