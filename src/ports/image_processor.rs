use std::path::Path;

use crate::domain::AppError;

/// Port for image metadata and transformations.
pub trait ImageProcessor: Send + Sync {
    /// Dimensions as `"WxH"`, or `None` when the image cannot be read.
    fn size_of(&self, path: &Path) -> Option<String>;

    /// Resize `path` in place to exactly `width` x `height`.
    fn resize(&self, path: &Path, width: u32, height: u32) -> Result<(), AppError>;

    /// Write a `width` x `height` thumbnail of `src` to `dst`.
    fn thumbnail(&self, src: &Path, dst: &Path, width: u32, height: u32) -> Result<(), AppError>;
}
