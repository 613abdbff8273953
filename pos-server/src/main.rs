use pos_server::{api, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    pos_server::init_logger(None, config.log_dir.as_deref());

    tracing::info!("sari POS print server starting...");

    let state = AppState::new(config);
    let app = api::router(state.clone());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Resolves on interrupt; tears down the shared browser before the
/// server stops accepting connections.
async fn shutdown_signal(state: AppState) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down...");
    state.browser.shutdown().await;
}
