//! Connector configuration loading from a TOML file.

use std::fs;
use std::path::Path;

use crate::domain::configuration::parse_config_content;
use crate::domain::{AppError, ConnectorConfig};

/// Load and validate the configuration at `config_path`.
///
/// A relative `root` is taken relative to the directory holding the file.
pub fn load_config(config_path: &Path) -> Result<ConnectorConfig, AppError> {
    if !config_path.is_file() {
        return Err(AppError::config_error(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let content = fs::read_to_string(config_path)?;
    let mut config = parse_config_content(&content)?;
    if config.root.is_relative()
        && let Some(base) = config_path.parent()
    {
        config.root = base.join(&config.root);
    }
    Ok(config)
}
