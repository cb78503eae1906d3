//! Configuration validation
//!
//! Runs before anything connects to the database or object storage.

use anyhow::Result;
use imgvault_core::Config;

/// Validate critical configuration values
///
/// Checks structural validity of the config and warns about settings that are
/// allowed but likely to be mistakes.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.db_max_connections() > 100 {
        tracing::warn!(
            db_max_connections = config.db_max_connections(),
            "DB_MAX_CONNECTIONS is very high - check the database connection limit"
        );
    }

    Ok(())
}
