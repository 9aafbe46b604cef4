use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use resolver::{AppConfig, ApplicationServer, Logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards are kept alive to flush logs and keep the sentry client around
    let _guards = Logger::init(config.cargo_env, config.sentry_dsn.clone());

    info!(
        "logger and env prepped, resolving against {} ({} attempts, {}ms apart)",
        config.upstream_api_url, config.max_attempts, config.retry_delay_ms
    );

    // this is the only place allowed to end the process on an error
    ApplicationServer::serve(config)
        .await
        .context("server failed to start")?;

    Ok(())
}
