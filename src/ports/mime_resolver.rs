use std::path::Path;

/// Port for looking up a file's MIME type.
pub trait MimeResolver: Send + Sync {
    /// MIME type for `path`; `"unknown/unknown"` when it cannot be determined.
    fn mime_for(&self, path: &Path) -> String;
}
