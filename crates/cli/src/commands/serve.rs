//! `serve`: the webhook listener and its queue worker.

use std::sync::Arc;

use anyhow::Context;
use listener::{QueueState, QueueWorker, StopOutcome, WorkerExit};
use processor::CardProcessor;
use relay::StatusReporter;

use crate::config::Config;
use crate::wiring;

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let board = wiring::board(config)?;
    let generator = wiring::generator(config)?;
    let slack = wiring::slack(config);
    let reporter: Arc<dyn StatusReporter> = Arc::new(slack.log);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let tcp = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let (state, receiver) = QueueState::new();
    let processor = Arc::new(CardProcessor::new(board.store, generator, Arc::clone(&reporter)));
    let worker = QueueWorker::new(receiver, Arc::clone(&state), processor, reporter)
        .with_poll_interval(config.server.poll_interval());
    let running = listener::start(worker);

    tracing::info!(%addr, mock = config.trello.mock, "cardrelay listening");
    let served = axum::serve(tcp, listener::router(Arc::clone(&state)))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let timeout = config.server.shutdown_timeout();
    match running.stop(timeout).await {
        StopOutcome::Stopped(WorkerExit::Sentinel | WorkerExit::StopFlag) => {
            tracing::info!(
                processed = state.processed_count(),
                failed = state.failed_count(),
                "Queue worker stopped"
            );
        }
        StopOutcome::Stopped(WorkerExit::Closed) => {
            tracing::info!("Queue worker exited after its queue closed");
        }
        StopOutcome::TimedOut => {
            tracing::warn!(
                timeout_secs = timeout.as_secs(),
                "Shutdown timed out with an event still in flight"
            );
        }
        StopOutcome::Crashed => {
            tracing::error!("Queue worker crashed during shutdown");
        }
    }

    served.context("HTTP server failed")?;
    tracing::info!("cardrelay shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}
