//! Pure parse/validate for connector configuration.

use crate::domain::{AppError, ConnectorConfig};

/// Parse and validate connector configuration from TOML content.
///
/// `root` is returned exactly as written; resolving a relative root is the
/// caller's concern.
pub fn parse_config_content(content: &str) -> Result<ConnectorConfig, AppError> {
    let config: ConnectorConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
