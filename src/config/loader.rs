use config::{Config, Environment};
use eyre::{Context, Result};

use crate::config::models::GatewayConfig;

/// Load configuration from `GEDDIT_`-prefixed environment variables using
/// the config crate (e.g. `GEDDIT_BASE_URL`, `GEDDIT_CREDENTIALS_FILE`).
pub fn load_from_env() -> Result<GatewayConfig> {
    let settings = Config::builder()
        .add_source(Environment::with_prefix("GEDDIT"))
        .build()
        .context("Failed to read configuration from environment")?;

    let gateway_config: GatewayConfig = settings.try_deserialize().context(
        "Failed to deserialize configuration; GEDDIT_BASE_URL and \
         GEDDIT_CREDENTIALS_FILE must be set",
    )?;

    Ok(gateway_config)
}
