use crate::domain::UploadedFile;

/// Port deciding the destination file name of an upload.
pub trait UploadNameResolver: Send + Sync {
    fn name_for(&self, file: &UploadedFile) -> String;
}

impl<F> UploadNameResolver for F
where
    F: Fn(&UploadedFile) -> String + Send + Sync,
{
    fn name_for(&self, file: &UploadedFile) -> String {
        self(file)
    }
}
