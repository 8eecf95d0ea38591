//! EmotionScope
//!
//! Serves emotion classification scores from a pretrained model over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use emotionscope_classifiers::load_classifier;
use emotionscope_server::cli::{AnalyzeArgs, Cli, Commands, ServeArgs};
use emotionscope_server::client::{format_report, EmotionClient, SAMPLE_TEXTS};
use emotionscope_server::{create_router, telemetry, AppState, ServiceConfig};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Analyze(args) => analyze(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    telemetry::init_tracing(args.verbose);

    info!("Starting EmotionScope");

    let config = ServiceConfig::load(&args.config, &args)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    info!("Model: {} ({})", config.model.name, config.model.source);
    info!("Device: {}", config.model.inference.device);

    if let Some(metrics_addr) = config.telemetry.metrics_listen {
        telemetry::init_metrics(metrics_addr)?;
    }

    // Model download and weight loading block; keep them off the async workers
    let model_config = config.model.clone();
    let classifier = tokio::task::spawn_blocking(move || load_classifier(&model_config))
        .await?
        .context("Failed to load emotion model")?;

    let addr = config.server.socket_addr()?;
    let app = create_router(AppState::new(classifier));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    telemetry::init_tracing(args.verbose);

    let client = EmotionClient::new(&args.url);
    let texts = if args.texts.is_empty() {
        SAMPLE_TEXTS.iter().map(|s| s.to_string()).collect()
    } else {
        args.texts
    };

    for text in &texts {
        match client.analyze(text).await {
            Ok(scores) => println!("{}", format_report(text, &scores)),
            Err(e) => println!("Error for text '{}': {}", text, e),
        }
    }

    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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

    warn!("Shutdown signal received, stopping server...");
}
