// BaZi Chart - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use bazi_chart::api::{router, AppState};
use bazi_chart::{CachedCalendar, Config, TableCalendar};

#[derive(Debug, Parser)]
#[command(name = "bazi-server", version, about = "HTTP API for Four Pillars charts")]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let calendar = TableCalendar::from_paths(&config.solar_terms_path, &config.lunar_months_path)
        .context("Failed to load calendar tables")?;
    tracing::info!(years = calendar.years().count(), "✓ calendar tables loaded");

    let state = AppState::new(Arc::new(CachedCalendar::new(calendar)), config.chart_settings());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "🚀 server running, POST /api/bazi");

    axum::serve(listener, app).await.context("Failed to start server")?;
    Ok(())
}
