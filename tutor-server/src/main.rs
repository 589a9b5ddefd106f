use std::net::SocketAddr;
use tracing::info;
use tutor_server::ollama::OllamaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let ollama = OllamaClient::from_env()?;
    info!("Relaying chat requests to {}", ollama.chat_url());

    let port: u16 = std::env::var("RELAY_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, tutor_server::app(ollama)).await?;

    Ok(())
}
