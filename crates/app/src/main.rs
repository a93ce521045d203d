//! WooLedger connector host.
//!
//! Loads configuration, opens the local ledger and runs payment
//! reconciliation on its schedule until interrupted.
//!
//! Build with `--features native-keyring` to read the API secret from the
//! OS keychain. The default build uses keyring's in-memory store, which is
//! empty at startup, so store calls fail with a configuration error.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wooledger_app::AppContext;
use wooledger_infra::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG from the file is honoured
    let dotenv = dotenvy::dotenv();
    init_tracing();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) => warn!(error = %e, "no .env file loaded"),
    }

    let config = config::load().context("failed to load configuration")?;
    let mut ctx = AppContext::new(config).context("failed to initialize application context")?;

    ctx.start().await.context("failed to start background jobs")?;
    info!("wooledger running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("shutdown requested");

    ctx.shutdown().await.context("failed to stop background jobs")?;
    Ok(())
}

/// Default level is `info`; override with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
