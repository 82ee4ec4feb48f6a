//! Startup configuration validation.

use anyhow::Result;
use prenoto_core::Config;

/// Fail fast on misconfiguration instead of surfacing it per-request.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.public_base_url.starts_with("http://localhost") {
        return Err(anyhow::anyhow!(
            "PUBLIC_BASE_URL must be set in production (campaign links would point at localhost)"
        ));
    }

    Ok(())
}
