use std::path::Path;

use tracing::info;

use super::Connector;
use crate::domain::{AppError, SandboxedPath};

impl Connector {
    /// Create the thumbnails directory if needed. Failure is fatal.
    pub(crate) fn ensure_thumbnail_directory(&self) -> Result<(), AppError> {
        if !self.config.thumbs.enabled {
            return Ok(());
        }
        let directory = &self.config.thumbs.directory;
        let dir = self
            .sandbox()
            .resolve(directory)
            .map_err(|e| AppError::ThumbnailDirectory(format!("{}: {}", directory, e)))?;

        if !dir.exists() && !dir.is_symlink() {
            dir.mkdir()
                .map_err(|e| AppError::ThumbnailDirectory(format!("{}: {}", directory, e)))?;
            info!(dir = %dir, "created thumbnails directory");
        }
        if !dir.is_dir() {
            return Err(AppError::ThumbnailDirectory(format!("{} is not a directory", directory)));
        }
        Ok(())
    }

    pub(crate) fn is_thumbnail_directory(&self, path: &SandboxedPath) -> bool {
        self.config.thumbs.enabled && path.relative() == Path::new(&self.config.thumbs.directory)
    }

    /// Where the thumbnail of `image` lives: `<thumbs dir>/<handle>.png`.
    pub(crate) fn thumbnail_for(&self, image: &SandboxedPath) -> Result<SandboxedPath, AppError> {
        self.sandbox()
            .root_path()
            .join(&self.config.thumbs.directory)?
            .join(format!("{}.png", self.hash(image)))
    }

    pub(crate) fn thumbnail_url(&self, image: &SandboxedPath) -> String {
        format!(
            "{}/{}/{}.png",
            self.config.base_url(),
            self.config.thumbs.directory,
            self.hash(image)
        )
    }

    /// Delete the thumbnail of `image`, if any.
    pub(crate) fn remove_thumbnail(&self, image: &SandboxedPath) -> Result<(), AppError> {
        if !self.config.thumbs.enabled {
            return Ok(());
        }
        let thumbnail = self.thumbnail_for(image)?;
        if thumbnail.is_file() {
            thumbnail.remove()?;
        }
        Ok(())
    }
}
