//! Talentgate server binary
//!
//! Careers-portal gateway: upload-grant issuance, role catalog, and
//! notification subscriptions behind one HTTP surface.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! talentgate --config config.yaml
//!
//! # With environment variables only
//! TALENTGATE_SERVER__PORT=8080 talentgate
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use talentgate_api::http::create_router;
use talentgate_backends::{
    BlobStore, MemoryBlobStore, MemoryRoleStore, MemoryTopic, NotificationTopic, RoleStore,
};
use talentgate_server::config::LoggingSettings;
use talentgate_server::{Gateway, GatewayConfig};

/// Talentgate - careers-portal request gateway
#[derive(Parser, Debug)]
#[command(name = "talentgate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = args.config {
        GatewayConfig::load(&config_path)?
    } else {
        GatewayConfig::from_env()?
    };

    init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting talentgate gateway"
    );

    match config.storage.backend.as_str() {
        "memory" => {
            info!(
                bucket = %config.storage.bucket,
                table = %config.roles.table,
                "Using in-memory backends"
            );
            let gateway = Gateway::new(
                Arc::new(MemoryBlobStore::new(config.storage.bucket.clone())),
                Arc::new(MemoryRoleStore::new()),
                Arc::new(MemoryTopic::new()),
                config.notifications.topic_arn.clone(),
            );
            serve(gateway, &config).await
        }
        other => {
            error!("Unknown storage backend: {}", other);
            anyhow::bail!("Unknown storage backend: {}", other);
        }
    }
}

/// Runs the HTTP server until a shutdown signal arrives.
async fn serve<B, R, N>(gateway: Gateway<B, R, N>, config: &GatewayConfig) -> anyhow::Result<()>
where
    B: BlobStore,
    R: RoleStore,
    N: NotificationTopic,
{
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let router = create_router(gateway);

    info!(%addr, region = %config.aws.region, "HTTP server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Initializes structured logging per configuration. `RUST_LOG` takes
/// precedence over the configured level when set.
fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args_parsing() {
        let args = Args::try_parse_from(["talentgate"]).unwrap();
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["talentgate", "--config", "config.yaml"]).unwrap();
        assert_eq!(args.config, Some("config.yaml".to_string()));

        let args = Args::try_parse_from(["talentgate", "-c", "test.yaml"]).unwrap();
        assert_eq!(args.config, Some("test.yaml".to_string()));
    }
}
