use crate::domain::UploadedFile;
use crate::ports::UploadNameResolver;

/// Uses the base name of the client-supplied filename.
///
/// Browsers on some platforms send full paths; only the last component is
/// kept. Falls back to the staged file's own name.
#[derive(Debug, Clone, Copy, Default)]
pub struct OriginalFilename;

impl UploadNameResolver for OriginalFilename {
    fn name_for(&self, file: &UploadedFile) -> String {
        let client_name = file.filename.rsplit(['/', '\\']).next().unwrap_or_default().trim();
        if !client_name.is_empty() && client_name != "." && client_name != ".." {
            return client_name.to_string();
        }
        file.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        let file = UploadedFile::new("/tmp/RackMultipart1", "report.pdf");
        assert_eq!(OriginalFilename.name_for(&file), "report.pdf");
    }

    #[test]
    fn strips_client_directories() {
        let file = UploadedFile::new("/tmp/upload", r"C:\Users\me\photo.jpg");
        assert_eq!(OriginalFilename.name_for(&file), "photo.jpg");
        let file = UploadedFile::new("/tmp/upload", "../../etc/passwd");
        assert_eq!(OriginalFilename.name_for(&file), "passwd");
    }

    #[test]
    fn falls_back_to_staged_name() {
        let file = UploadedFile::new("/tmp/staged.bin", "");
        assert_eq!(OriginalFilename.name_for(&file), "staged.bin");
        let file = UploadedFile::new("/tmp/staged.bin", "..");
        assert_eq!(OriginalFilename.name_for(&file), "staged.bin");
    }
}
