use std::path::Path;

use crate::app::api;
use crate::domain::AppError;

pub fn run_hash(config: &Path, path: &str) -> Result<(), AppError> {
    let connector = api::connector_at(config)?;
    println!("{}", connector.handle_for(path)?);
    Ok(())
}

pub fn run_unhash(config: &Path, handle: &str) -> Result<(), AppError> {
    let connector = api::connector_at(config)?;
    let path = connector.path_for(handle).ok_or_else(|| {
        AppError::config_error(format!("Handle '{}' does not resolve inside the root", handle))
    })?;
    println!("{}", path.relative_display());
    Ok(())
}
