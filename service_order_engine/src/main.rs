//! Entry point for the Service Order Engine binary.
//!
//! Running this binary starts an HTTP server that prices staffing jobs
//! and creates service orders.  Settings come from `ORDER_`-prefixed
//! environment variables (see `config::Settings`); log verbosity is
//! controlled with `RUST_LOG`.

use service_order_engine::{api, config::Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new()?;
    if let Err(err) = api::serve(settings).await {
        tracing::error!(error = %err, "error running server");
        return Err(err);
    }
    Ok(())
}
