//! GROBID Parse Server
//!
//! HTTP front end for turning harvested PDFs into stored TEI XML.

use std::net::SocketAddr;
use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grobid_parse_server::config::Config;
use grobid_parse_server::grobid::GrobidClient;
use grobid_parse_server::index::DynamoIndex;
use grobid_parse_server::pipeline::{ParsePipeline, PipelineSettings};
use grobid_parse_server::routes;
use grobid_parse_server::state::AppState;
use grobid_parse_server::storage::S3Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    let default_filter = if config.server.mode.is_debug() {
        "grobid_parse_server=debug,tower_http=debug"
    } else {
        "grobid_parse_server=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GROBID Parse Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Mode: {:?}", config.server.mode);
    tracing::info!("PDF bucket: {}", config.storage.pdf_bucket);
    tracing::info!("XML bucket: {}", config.storage.xml_bucket);
    tracing::info!("Duplicate check: {}", config.parse.duplicate_check);

    // AWS clients share one SDK config
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.storage.region.clone()))
        .load()
        .await;

    let s3_client = S3Client::new(&sdk_config, &config.storage).await;
    let index = DynamoIndex::new(&sdk_config, &config.index);
    tracing::info!("DynamoDB table: {}", index.table());

    let grobid = GrobidClient::new(&config.grobid);
    tracing::info!("GROBID: {}", grobid.base_url());

    let pipeline = ParsePipeline::new(
        Arc::new(s3_client),
        Arc::new(index),
        Arc::new(grobid),
        PipelineSettings::from(&config),
    );

    if pipeline.grobid_alive().await {
        tracing::info!("GROBID is alive");
    } else {
        tracing::warn!("GROBID is not responding. Parse requests will fail until it is up.");
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::app(AppState::new(config, pipeline))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server with graceful shutdown
    tracing::info!("GROBID Parse Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
