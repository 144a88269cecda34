use aditya_cme_monitor::{cli, config, openapi, routes, services, state};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind aditya-cme-monitor listener on {addr}: port already in use. Stop the other service using this port or re-run with --port to choose another port.",
            );
        }
        Err(err) => Err(err)
            .with_context(|| format!("failed to bind aditya-cme-monitor listener on {addr}")),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {err:#}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if args.print_openapi {
        println!(
            "{}",
            serde_json::to_string_pretty(&openapi::openapi_json())?
        );
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::MonitorConfig::from_env()?;
    let gateway = Arc::new(services::fetch_gateway::FetchGateway::new(
        reqwest::Client::new(),
        config.fetch_policy(),
    ));
    let processor = Arc::new(services::solar_processor::SolarDataProcessor::new(
        gateway,
        config.endpoints(),
        Arc::new(services::simulated::RandomSource::from_entropy()),
    ));

    let state = state::AppState {
        processor: processor.clone(),
        latest: services::poller::SnapshotStore::default(),
    };

    let poller = config.enable_poller.then(|| {
        tracing::info!(
            interval_seconds = config.poll_interval_seconds,
            dataset = ?config.poll_dataset,
            range = ?config.poll_range,
            "starting dashboard poller"
        );
        services::poller::DashboardPoller::new(
            processor,
            state.latest.clone(),
            config.poll_dataset,
            config.poll_range,
            Duration::from_secs(config.poll_interval_seconds),
        )
        .start()
    });

    let app = routes::router(state);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = bind_listener(&addr).await?;
    tracing::info!("listening on {addr}");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(poller) = poller {
        poller.stop().await;
    }
    served.context("HTTP server failed")?;
    Ok(())
}
