use anyhow::{Context, Result, anyhow};
use std::str::FromStr;

use crate::{
    auth::PasswordScheme,
    config::{
        config_model::{DemoAccount, DotEnvyConfig, Security, Server, Storage, StorageBackend},
        stage::Stage,
    },
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from an arbitrary variable source so it can be driven without touching the
/// process environment.
pub fn load_from<F>(var: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let stage = var("STAGE")
        .map(|raw| Stage::try_from(&raw).unwrap_or_default())
        .unwrap_or_default();

    let server = Server {
        port: var("SERVER_PORT")
            .unwrap_or_else(|| "8501".to_string())
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: var("SERVER_BODY_LIMIT")
            .unwrap_or_else(|| "512".to_string())
            .parse::<usize>()
            .ok()
            .and_then(|mib| mib.checked_mul(1024 * 1024))
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: var("SERVER_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let storage = Storage {
        backend: StorageBackend::from_str(
            &var("STORAGE_BACKEND").unwrap_or_else(|| "sqlite".to_string()),
        )
        .map_err(|err| anyhow!(err))
        .context("STORAGE_BACKEND is invalid")?,
        database_url: var("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| ":memory:".to_string()),
        max_connections: var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "4".to_string())
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .context("DATABASE_MAX_CONNECTIONS is invalid")?,
    };

    let security = Security {
        password_scheme: PasswordScheme::from_str(
            &var("PASSWORD_SCHEME").unwrap_or_else(|| "argon2".to_string()),
        )
        .map_err(|err| anyhow!(err))
        .context("PASSWORD_SCHEME is invalid")?,
        session_ttl_minutes: var("SESSION_TTL_MINUTES")
            .unwrap_or_else(|| "60".to_string())
            .parse::<i64>()
            .ok()
            .filter(|v| *v > 0)
            .context("SESSION_TTL_MINUTES is invalid")?,
        cookie_secure: var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_string())
            .parse()
            .context("SESSION_COOKIE_SECURE is invalid")?,
    };

    let demo_enabled = match var("DEMO_ACCOUNT_ENABLED") {
        Some(raw) => raw.parse().context("DEMO_ACCOUNT_ENABLED is invalid")?,
        None => stage != Stage::Production,
    };

    let demo_account = demo_enabled.then(|| DemoAccount {
        username: var("DEMO_USERNAME").unwrap_or_else(|| "admin".to_string()),
        email: var("DEMO_EMAIL").unwrap_or_else(|| "admin@streamflow.com".to_string()),
        password: var("DEMO_PASSWORD").unwrap_or_else(|| "admin123".to_string()),
    });

    Ok(DotEnvyConfig {
        stage,
        server,
        storage,
        security,
        demo_account,
    })
}
