use std::sync::Arc;

use clap::Parser;
use sheetkit_server::conf::{RETENTION_AGE_MAX, RETENTION_SWEEP_MINUTE, ServerArgs};
use sheetkit_server::sweeper::{RetentionSweeper, SystemClock};
use sheetkit_server::{AppState, build_router};
use sheetkit_web_reader::ArticleReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = ServerArgs::parse();
    std::fs::create_dir_all(&args.output_dir)?;
    let addr = args.derive_bind_addr()?;
    let base_url = args.derive_base_url();

    let state = AppState::new(&args.output_dir, base_url.clone(), ArticleReader::new()?);
    let app = build_router(state);

    let handle_sweeper = if args.disable_sweeper {
        info!("retention sweeper disabled");
        None
    } else {
        let sweeper = RetentionSweeper::new(
            &args.output_dir,
            RETENTION_AGE_MAX,
            RETENTION_SWEEP_MINUTE,
            Arc::new(SystemClock),
        );
        Some(sweeper.spawn())
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        output_dir = %args.output_dir.display(),
        %base_url,
        "sheetkit server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await?;

    if let Some(handle) = handle_sweeper {
        handle.stop().await;
    }
    info!("sheetkit server shutdown complete");
    Ok(())
}

async fn create_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}
