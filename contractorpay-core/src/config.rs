//! Environment-driven configuration
//!
//! Every setting has a development-friendly default so the tool starts with
//! nothing but a reachable Postgres. Secrets left at their defaults are
//! warned about at load time rather than rejected; this is an internal
//! back-office tool, not a hardened public service.

use std::env;

use serde::Deserialize;

/// Fallback session signing secret. Fine for local development only.
const DEFAULT_SESSION_SECRET: &str = "contractorpay-dev-secret";

/// Fallback first-run admin credentials.
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub admin_seed: AdminSeedConfig,
    pub receipts: ReceiptStoreConfig,
}

/// Relational store connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string
    pub url: String,
    /// Require TLS on the connection (DATABASE_SSL=true)
    pub ssl: bool,
    /// Pool size; kept low for a low-traffic internal tool
    pub max_connections: u32,
}

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC key for the session token
    pub secret: String,
    /// Fixed session lifetime; no refresh or rotation
    pub ttl_hours: u64,
}

/// Credentials used only when seeding the first admin account
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub username: String,
    pub password: String,
}

impl AdminSeedConfig {
    /// True when the fallback credentials are still in place.
    pub fn is_default(&self) -> bool {
        self.username == DEFAULT_ADMIN_USERNAME && self.password == DEFAULT_ADMIN_PASSWORD
    }
}

/// Receipt image object store settings
#[derive(Debug, Clone)]
pub struct ReceiptStoreConfig {
    pub enabled: bool,
    /// Base endpoint of the S3-compatible store
    pub endpoint: String,
    pub bucket: String,
    pub api_token: String,
    /// Base URL receipts are publicly served from
    pub public_base_url: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/contractorpay".to_string()),
            ssl: env_flag("DATABASE_SSL"),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        };

        let session = SessionConfig {
            secret: env::var("SESSION_SECRET").unwrap_or_else(|_| {
                tracing::warn!("SESSION_SECRET not set, using development default");
                DEFAULT_SESSION_SECRET.to_string()
            }),
            ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        };

        let admin_seed = AdminSeedConfig {
            username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
            password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
        };

        let receipts = ReceiptStoreConfig {
            enabled: env_flag("RECEIPTS_ENABLED"),
            endpoint: env::var("RECEIPTS_ENDPOINT").unwrap_or_default(),
            bucket: env::var("RECEIPTS_BUCKET").unwrap_or_else(|_| "receipts".to_string()),
            api_token: env::var("RECEIPTS_API_TOKEN").unwrap_or_default(),
            public_base_url: env::var("RECEIPTS_PUBLIC_URL").unwrap_or_default(),
        };

        Self {
            database,
            session,
            admin_seed,
            receipts,
        }
    }
}

/// Parse a boolean env toggle; only "true"/"1" count as set.
fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("true") | Ok("1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_seed_detected() {
        let seed = AdminSeedConfig {
            username: "admin".into(),
            password: "admin".into(),
        };
        assert!(seed.is_default());

        let seed = AdminSeedConfig {
            username: "admin".into(),
            password: "rotated".into(),
        };
        assert!(!seed.is_default());
    }

    #[test]
    fn env_flag_parsing() {
        // Unset variables read as false
        assert!(!env_flag("CONTRACTORPAY_TEST_FLAG_THAT_IS_NEVER_SET"));
    }
}
