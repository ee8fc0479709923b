use kanban_backend::config::Config;
use kanban_backend::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting kanban backend on {}", config.bind_addr);

    server::run(config).await
}
