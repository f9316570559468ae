//! HTTP server command
//!
//! Runs the back-office API with all routes mounted.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use contractorpay_core::AppConfig;
use contractorpay_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3050")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let app_config = AppConfig::from_env();

    tracing::info!("starting contractorpay server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    run_server(app_config, config).await.context("server error")
}
