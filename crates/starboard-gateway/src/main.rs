//! Starboard bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p starboard-gateway --bin starboard
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use starboard_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing, JSON in production
    let tracing_result = match &config {
        Ok(config) => try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)),
        Err(_) => try_init_tracing(),
    };
    if let Err(e) = tracing_result {
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
        name = %config.app.name,
        env = ?config.app.env,
        threshold = config.starboard.star_threshold,
        "Starting starboard bot..."
    );

    if let Err(e) = starboard_gateway::run(config).await {
        error!(error = %e, code = e.error_code(), "Starboard bot failed");
        std::process::exit(1);
    }
}
