use dotenvy::dotenv;
use fra_portal_backend::config::PortalConfig;
use fra_portal_backend::infrastructure::{database, storage};
use fra_portal_backend::services::analyzer::{DocumentAnalyzer, create_analyzer};
use fra_portal_backend::services::processing::ProcessingService;
use fra_portal_backend::services::worker::BackgroundWorker;
use fra_portal_backend::{AppState, create_app};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fra_portal_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🌲 Starting FRA Portal backend...");

    let config = PortalConfig::from_env();
    info!(
        "⚙️  Config: max upload {} MB, analyzer '{}' ({} ms ticks), demo seed {}",
        config.max_file_size / 1024 / 1024,
        config.analyzer_type,
        config.processing_tick_ms,
        config.seed_demo_data
    );

    let db = database::setup_database(config.seed_demo_data).await?;
    let storage_service = storage::setup_storage(&config.storage_dir).await?;

    let analyzer: Arc<dyn DocumentAnalyzer> = Arc::from(create_analyzer(
        &config.analyzer_type,
        config.processing_tick_ms,
        config.processing_step,
    ));
    let processing = Arc::new(ProcessingService::new(db.clone(), analyzer));

    let state = AppState {
        db: db.clone(),
        storage: storage_service.clone(),
        processing,
        config: config.clone(),
    };

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let worker = BackgroundWorker::new(db.clone(), shutdown_rx);
    tokio::spawn(async move {
        worker.run().await;
    });

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!("↩ {} in {:?}", response.status(), latency);
            },
        );

    let app = create_app(state).layer(trace_layer);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("✅ Portal API listening on http://{}", addr);
    info!("📖 Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    info!("🛑 Portal backend stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, draining connections..."),
        _ = terminate => info!("SIGTERM received, draining connections..."),
    }
}
