// src/main.rs
use anyhow::Result;
use std::io;
use tokio::signal;
use tracing::{error, info};

mod config;
mod server;
mod startup;

use crate::{
    config::load_env,
    server::{AppHandler, ServerBuilder},
    startup::start,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("http_bootstrap=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Resolve the listen port from the environment
    let env = load_env()?;
    info!("Resolved environment configuration, port {}", env.port);

    // The application object: handler injected, not yet listening
    let app = ServerBuilder::new().with_handler(AppHandler::new());

    // Single bind attempt; a failure here is fatal to the process
    let handle = match start(app, env.port, &mut io::stdout(), &mut io::stderr()).await {
        Ok(handle) => handle,
        Err(_) => std::process::exit(1),
    };

    tokio::select! {
        result = handle.wait() => {
            if let Err(err) = result {
                error!("server terminated unexpectedly: {}", err);
                std::process::exit(1);
            }
        }
        _ = shutdown_signal() => {}
    }

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
