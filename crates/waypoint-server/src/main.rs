use anyhow::{Context, Result};
use waypoint_server::config::{LogSettings, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging first so configuration warnings are visible
    waypoint_server::init_logging(&LogSettings::from_env());

    // Load configuration from environment variables
    let config = ServerConfig::load().context("Failed to load configuration")?;

    // Run the server using the library's run function
    waypoint_server::run(config).await.context("Server error")?;

    Ok(())
}
