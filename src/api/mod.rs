pub mod routes;

use crate::auth::SessionValidator;
use crate::config::Config;
use crate::report::service::WeeklyReportService;
use anyhow::{Context, Result};
use axum::Router;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

pub async fn run_server(
    config: &Config,
    reports: WeeklyReportService,
    sessions: Arc<dyn SessionValidator>,
) -> Result<()> {
    let state = routes::ApiState { reports, sessions };
    let app: Router = routes::router(state);

    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, config.api_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API server: {addr}"))?;

    info!(address = %addr, "moodweek API server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("API server failed")?;

    Ok(())
}
