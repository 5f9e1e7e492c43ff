use tracing_subscriber::EnvFilter;

use skinsight_server::config::ServerConfig;
use skinsight_server::model::build_model_chain;
use skinsight_server::{app, AppState};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let chain = match build_model_chain(&config) {
        Ok(chain) => chain,
        Err(e) => {
            tracing::error!(error = %e, "failed to create model clients");
            std::process::exit(1);
        }
    };

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "invalid listen address");
            std::process::exit(1);
        }
    };

    tracing::info!(
        use_vertex = config.use_vertex,
        project = %config.vertex.project_id,
        location = %config.vertex.location,
        endpoint_id = %config.vertex.endpoint_id,
        project_number = %config.vertex.project_number,
        gac = if config.vertex.credentials_path.is_some() { "set" } else { "unset" },
        backends = ?chain.names(),
        "configuration loaded"
    );

    let router = app(AppState::new(config, chain));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, "failed to bind on {addr}");
            std::process::exit(1);
        }
    };
    tracing::info!("analyze API listening on http://{addr}");

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
