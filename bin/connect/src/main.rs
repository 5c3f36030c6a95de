use sluice_connect::{CliError, ConnectConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> sluice_core::Result<(), CliError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Optional config file path as the only argument; `sluice.toml` otherwise
    let config_file = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ConnectConfig::load(config_file.as_deref()).map_err(|e| CliError::Config {
        details: e.to_string(),
    })?;
    tracing::info!(service = %config.connection.service, "Loaded configuration");

    sluice_connect::run(config).await
}
