use genmedia_gateway::server::{self, GatewayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(target: "genmedia::server", error = %err, "invalid configuration");
            std::process::exit(2);
        }
    };
    if let Err(err) = server::run(config).await {
        tracing::error!(target: "genmedia::server", error = %err, "server stopped");
        std::process::exit(1);
    }
}
