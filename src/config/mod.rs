use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub access: AccessConfig,
    pub login: LoginConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Collection slugs readable by everyone, anonymous included
    pub public_read: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    pub client_lookup_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Log every denied or rewritten change at info level
    pub enable_audit_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("ACCESS_PUBLIC_READ") {
            self.access.public_read = parse_list(&v);
        }

        if let Ok(v) = env::var("LOGIN_CLIENT_LOOKUP_TIMEOUT_MS") {
            self.login.client_lookup_timeout_ms = v.parse().unwrap_or(self.login.client_lookup_timeout_ms);
        }

        if let Ok(v) = env::var("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            access: AccessConfig { public_read: Vec::new() },
            login: LoginConfig { client_lookup_timeout_ms: 5_000 },
            security: SecurityConfig { enable_audit_logging: false },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            access: AccessConfig { public_read: Vec::new() },
            login: LoginConfig { client_lookup_timeout_ms: 2_000 },
            security: SecurityConfig { enable_audit_logging: true },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            access: AccessConfig { public_read: Vec::new() },
            login: LoginConfig { client_lookup_timeout_ms: 1_000 },
            security: SecurityConfig { enable_audit_logging: true },
        }
    }

    pub fn is_public_read(&self, slug: &str) -> bool {
        self.access.public_read.iter().any(|s| s == slug)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
