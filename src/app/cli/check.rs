use std::path::Path;

use crate::app::api;
use crate::domain::AppError;

pub fn run_check(config: &Path) -> Result<(), AppError> {
    let connector = api::connector_at(config)?;
    println!("✅ Configuration OK (root: {})", connector.sandbox().root().display());
    Ok(())
}
