use std::{fmt::Display, str::FromStr};

use crate::{auth::PasswordScheme, config::stage::Stage};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub stage: Stage,
    pub server: Server,
    pub storage: Storage,
    pub security: Security,
    pub demo_account: Option<DemoAccount>,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// Request body limit in bytes, configured in MiB.
    pub body_limit: usize,
    /// Request timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub backend: StorageBackend,
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Security {
    pub password_scheme: PasswordScheme,
    pub session_ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Clone)]
pub struct DemoAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for DemoAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        };
        write!(f, "{}", backend)
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "sqlite" | "relational" => Ok(StorageBackend::Sqlite),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("Unsupported storage backend: {}", other)),
        }
    }
}
