use tinyledger_api::{Config, Server, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tinyledger_observability::init();

    let config = Config::from_env()?;
    Server::new(config).run(server::shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}
