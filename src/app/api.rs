//! API facade for the application.
//!
//! Glues configuration loading to connector construction and request execution.

use std::path::Path;

use crate::app::Connector;
use crate::app::config;

pub use crate::domain::{AppError, ConnectorConfig, Headers, Request, Response};

/// Load and validate a connector configuration file.
pub fn load_config(config_path: &Path) -> Result<ConnectorConfig, AppError> {
    config::load_config(config_path)
}

/// Build a connector with the default collaborators from a configuration file.
pub fn connector_at(config_path: &Path) -> Result<Connector, AppError> {
    Connector::new(load_config(config_path)?)
}

/// Run a single request against the connector described by `config_path`.
pub fn run_request_at(
    config_path: &Path,
    request: &Request,
) -> Result<(Headers, Response), AppError> {
    connector_at(config_path)?.run(request)
}

/// Parse a JSON request document.
pub fn parse_request(json: &str) -> Result<Request, AppError> {
    Ok(serde_json::from_str(json)?)
}
