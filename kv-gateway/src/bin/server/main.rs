use kv_gateway::app::shutdown_signal;
use kv_gateway::app::App;
use kv_gateway::config::Config;
use kv_gateway::telemetry;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    telemetry::init(config.env)?;

    tracing::info!(
        service = "kv-gateway",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        "Service starting"
    );

    tracing::info!(
        address = %config.server.address,
        users_backend = ?config.users.backend,
        storage_backend = ?config.storage.backend,
        storage_nodes = ?config.storage.nodes,
        token_ttl_secs = config.jwt.token_ttl_secs,
        "Configuration loaded"
    );

    let app = App::build(&config).await?;
    app.run(shutdown_signal()).await?;

    tracing::info!(service = "kv-gateway", "Service stopped");

    Ok(())
}
