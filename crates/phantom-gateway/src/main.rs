//! phantom gateway binary.
//!
//! - Catch-all ingest route, `/metrics`, `/healthz`, `/readyz`
//! - SIGUSR1 toggles debug mode through the control channel
//! - Ctrl-C / SIGTERM drain and shut down gracefully

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use phantom_gateway::{app_state::AppState, config::Args, router};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match Args::parse().into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("phantom: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.server.log_level));
    fmt().with_env_filter(filter).init();

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "error listening and serving");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: phantom_gateway::config::PhantomConfig) -> std::io::Result<()> {
    let listen = cfg
        .server
        .listen_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let state = AppState::new(cfg)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let (control_tx, _control) = state.start_control();
    #[cfg(unix)]
    let _signals = phantom_gateway::control::spawn_signal_listener(control_tx)?;
    #[cfg(not(unix))]
    drop(control_tx);

    let app = router::build_router(state.clone());

    let server = &state.cfg().server;
    tracing::info!(
        %listen,
        header = %server.header,
        debug = server.debug,
        labels = ?server.labels,
        count_mode = ?server.count_mode,
        "starting listening to requests"
    );
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
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
    state.set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}
