use mock_server::Stub;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let status = std::env::var("STUB_STATUS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, status, "stub server listening");

    let (router, _journal) = mock_server::app(vec![Stub::any(status)]);
    mock_server::run(listener, router).await
}
