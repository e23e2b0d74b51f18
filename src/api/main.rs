use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, warn};

use fishbone_api::config::AppConfig;
use fishbone_api::middleware::observability::init_observability;
use fishbone_api::routes::{create_app, create_app_state_with_storage};
use fishbone_api::storage::fixtures::seed_mock_diagrams;

// Panic hook to catch and log panics
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred!");
        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            eprintln!("Panic message: {}", s);
        }
        if let Some(location) = panic_info.location() {
            eprintln!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
    }));
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    setup_panic_hook();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let observability = init_observability(&config)?;
    info!("Application starting...");

    let app_state = create_app_state_with_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    if config.seed_mock_data {
        let storage = app_state.diagram_service.storage();
        if let Err(e) = seed_mock_diagrams(storage.as_ref()).await {
            warn!("Failed to seed mock diagrams: {}", e);
        }
    }

    let app = create_app(app_state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    observability.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
