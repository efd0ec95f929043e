const DEFAULT_ADDR: &str = "0.0.0.0:3001";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info".into()),
        )
        .init();

    let addr = std::env::var("MESHLAB_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, server::app()).await {
        tracing::error!("Server error: {e}");
    }
}
