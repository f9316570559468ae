//! Schema migration command
//!
//! Applies the schema without starting the server. Useful for deploy
//! hooks and for preparing a fresh test database.

use anyhow::{Context, Result};
use clap::Parser;

use contractorpay_core::AppConfig;
use contractorpay_server::db::{self, migrations};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {}

/// Apply the schema and exit
pub async fn run_migrate(_args: MigrateArgs) -> Result<()> {
    let app_config = AppConfig::from_env();

    let pool = db::acquire(&app_config.database)
        .await
        .context("could not connect to database")?;

    migrations::run(pool).await.context("migration failed")?;
    tracing::info!("schema is up to date");

    db::shutdown().await;
    Ok(())
}
