//! Streaming gateway entry point
//!
//! Run with:
//! ```bash
//! GATEWAY_PORT=8080 cargo run -p stream-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use stream_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // The log format follows APP_ENV, so configuration is read first
    let tracing_config = config
        .as_ref()
        .map_or_else(|_| TracingConfig::default(), |c| TracingConfig::for_environment(c.app.env));
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        address = %config.gateway.address(),
        "Configuration loaded"
    );

    if let Err(e) = stream_gateway::run(config).await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}
