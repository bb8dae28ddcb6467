//! Show the effective configuration.

use crate::config::Config;
use crate::error::Result;

/// Execute the config command.
pub fn execute_config(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
