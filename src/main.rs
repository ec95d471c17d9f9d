//! HTTP server for the Net Pay Engine.
//!
//! Reads `NET_PAY_CONFIG_DIR` and `NET_PAY_BIND_ADDR`, loads the
//! jurisdiction configuration, and serves the API. Log output is
//! filtered by `RUST_LOG`.

use anyhow::Context;
use net_pay_engine::api::{AppState, create_router};
use net_pay_engine::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/de_2025";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_dir =
        std::env::var("NET_PAY_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr =
        std::env::var("NET_PAY_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let loader = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {config_dir}"))?;
    info!(
        config_dir = %config_dir,
        country = %loader.metadata().country,
        tax_year = loader.metadata().tax_year,
        "Configuration loaded"
    );

    let router = create_router(AppState::new(loader));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, "Net pay server listening");

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
