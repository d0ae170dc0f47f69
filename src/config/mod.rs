use std::env;

use serde::{Deserialize, Serialize};

/// Server configuration, constructed once at startup and carried in the
/// application state. No ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Identity-provider settings for token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Tenant domain, e.g. `dev-example.us.auth0.com`.
    pub domain: String,
    /// API audience expected in inbound tokens.
    pub audience: String,
}

impl AuthConfig {
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }

    /// Issuer expected in inbound tokens. The provider issues with a
    /// trailing slash.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
            connection_timeout: env_parse("DATABASE_CONNECTION_TIMEOUT", 30),
        };

        let auth = AuthConfig {
            domain: env::var("AUTH0_DOMAIN")
                .map_err(|_| anyhow::anyhow!("AUTH0_DOMAIN is not set"))?,
            audience: env::var("AUTH0_AUDIENCE")
                .map_err(|_| anyhow::anyhow!("AUTH0_AUDIENCE is not set"))?,
        };

        Ok(Self {
            environment,
            database,
            auth,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
