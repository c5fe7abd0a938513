use std::path::Path;

use crate::domain::AppError;

/// Port for running archivers and extractors.
///
/// Arguments are passed to the program as-is; no shell is involved.
pub trait ToolRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), AppError>;
}
