use anyhow::Result;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod pipeline;
mod prompt;
mod replicate;
mod routes;
mod state;
mod types;
mod utils;

use config::CONFIG;
use db::database::Database;
use state::AppState;
use utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guards = init_logging();

    info!("Starting persona studio backend");
    let db = Database::init(&CONFIG.database_url).await?;
    let state = AppState::new(db);
    let app = routes::router(state);

    let addr = format!("{}:{}", CONFIG.host, CONFIG.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
