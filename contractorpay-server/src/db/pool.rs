//! Process-wide connection pool
//!
//! The pool is created lazily on first use. Concurrent first callers share
//! one initialization attempt instead of racing to open duplicate
//! connections; everyone afterwards gets the same handle.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tokio::sync::OnceCell;

use contractorpay_core::config::DatabaseConfig;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get the shared pool, initializing it on first call.
///
/// Initialization failure (bad connection string, unreachable database)
/// propagates to the caller. There is no retry; the next call attempts
/// initialization again.
pub async fn acquire(config: &DatabaseConfig) -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| connect(config)).await
}

async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut options: PgConnectOptions = config.url.parse()?;
    if config.ssl {
        options = options.ssl_mode(PgSslMode::Require);
    }

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Close the pool on process exit, if it was ever opened.
pub async fn shutdown() {
    if let Some(pool) = POOL.get() {
        pool.close().await;
        tracing::info!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ssl: false,
            max_connections: 5,
        }
    }

    #[tokio::test]
    async fn bad_url_is_an_error() {
        let config = test_config("not-a-connection-string");
        assert!(connect(&config).await.is_err());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p contractorpay-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_first_callers_share_one_pool() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = test_config(&url);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let config = config.clone();
                tokio::spawn(async move { acquire(&config).await.map(|p| p as *const PgPool as usize) })
            })
            .collect();

        let mut addrs = Vec::new();
        for handle in handles {
            addrs.push(handle.await.expect("task panicked").expect("pool init failed"));
        }

        // Every caller got the same pool instance
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
