//! Filesystem queries and mutations on [`SandboxedPath`].

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::debug;

use super::SandboxedPath;
use crate::domain::AppError;

impl SandboxedPath {
    /// Whether the path exists (following symlinks).
    pub fn exists(&self) -> bool {
        self.full_path().exists()
    }

    pub fn is_file(&self) -> bool {
        self.full_path().is_file()
    }

    pub fn is_dir(&self) -> bool {
        self.full_path().is_dir()
    }

    pub fn is_symlink(&self) -> bool {
        self.full_path().is_symlink()
    }

    /// Whether the process can read the path: open it as a file or list it as a directory.
    pub fn readable(&self) -> bool {
        let full = self.full_path();
        if full.is_dir() {
            fs::read_dir(&full).is_ok()
        } else if full.is_file() {
            fs::File::open(&full).is_ok()
        } else {
            false
        }
    }

    /// Whether the OS permission bits allow writing.
    pub fn writable(&self) -> bool {
        fs::metadata(self.full_path()).map(|m| !m.permissions().readonly()).unwrap_or(false)
    }

    /// File size in bytes; 0 when missing.
    pub fn size(&self) -> u64 {
        fs::metadata(self.full_path()).map(|m| m.len()).unwrap_or(0)
    }

    pub fn modified(&self) -> Option<SystemTime> {
        fs::symlink_metadata(self.full_path()).and_then(|m| m.modified()).ok()
    }

    /// "file", "directory" or "link", for user-facing messages.
    pub fn kind_label(&self) -> &'static str {
        if self.is_symlink() {
            "link"
        } else if self.is_dir() {
            "directory"
        } else {
            "file"
        }
    }

    /// Raw link target when the path is a symlink.
    pub fn read_link(&self) -> Option<PathBuf> {
        fs::read_link(self.full_path()).ok()
    }

    /// Immediate children, sorted case-insensitively by name.
    ///
    /// Entries that cannot be confined (symlinks pointing out of the root) are skipped.
    pub fn children(&self) -> Result<Vec<SandboxedPath>, AppError> {
        let mut children = Vec::new();
        for entry in fs::read_dir(self.full_path())? {
            let entry = entry?;
            match self.join(entry.file_name()) {
                Ok(child) => children.push(child),
                Err(err) => debug!(parent = %self, error = %err, "skipping unconfined entry"),
            }
        }
        children.sort_by_key(|child| child.file_name().to_lowercase());
        Ok(children)
    }

    /// Immediate child directories, sorted case-insensitively by name.
    pub fn child_directories(&self) -> Result<Vec<SandboxedPath>, AppError> {
        Ok(self.children()?.into_iter().filter(SandboxedPath::is_dir).collect())
    }

    pub fn mkdir(&self) -> Result<(), AppError> {
        fs::create_dir(self.full_path())?;
        Ok(())
    }

    /// Create an empty file; fails if anything already exists at the path.
    pub fn create_file(&self) -> Result<(), AppError> {
        fs::OpenOptions::new().write(true).create_new(true).open(self.full_path())?;
        Ok(())
    }

    /// Read content as text, replacing invalid UTF-8.
    pub fn read_to_string(&self) -> Result<String, AppError> {
        let bytes = fs::read(self.full_path())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write(&self, content: &str) -> Result<(), AppError> {
        fs::write(self.full_path(), content)?;
        Ok(())
    }

    /// Remove a single node: a file or link, or an empty directory.
    pub fn remove(&self) -> Result<(), AppError> {
        let full = self.full_path();
        let metadata = fs::symlink_metadata(&full)?;
        if metadata.is_dir() {
            fs::remove_dir(&full)?;
        } else {
            fs::remove_file(&full)?;
        }
        Ok(())
    }

    /// Remove the node and everything beneath it, without following symlinks.
    pub fn remove_all(&self) -> Result<(), AppError> {
        let full = self.full_path();
        if fs::symlink_metadata(&full)?.is_dir() {
            fs::remove_dir_all(&full)?;
        } else {
            fs::remove_file(&full)?;
        }
        Ok(())
    }

    /// Move to `to`, falling back to copy + delete across devices.
    ///
    /// On success `self` refers to the destination.
    pub fn rename(&mut self, to: &SandboxedPath) -> Result<(), AppError> {
        match fs::rename(self.full_path(), to.full_path()) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
                debug!(from = %self, to = %to, "rename crosses devices, copying instead");
                self.copy_to(to)?;
                self.remove_all()?;
            }
            Err(err) => return Err(err.into()),
        }
        self.relative = to.relative.clone();
        Ok(())
    }

    /// Copy to `dst`, recursively for directories. Symlinks are recreated, not followed.
    pub fn copy_to(&self, dst: &SandboxedPath) -> Result<(), AppError> {
        copy_recursive(&self.full_path(), &dst.full_path())?;
        Ok(())
    }

    /// Apply Unix permission bits; a no-op elsewhere.
    pub fn set_mode(&self, mode: u32) -> Result<(), AppError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(self.full_path(), fs::Permissions::from_mode(mode))?;
        }
        #[cfg(not(unix))]
        let _ = mode;
        Ok(())
    }
}

fn copy_recursive(src: &std::path::Path, dst: &std::path::Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(src)?;
    if metadata.is_symlink() {
        copy_link(src, dst)
    } else if metadata.is_dir() {
        fs::create_dir(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dst).map(|_| ())
    }
}

#[cfg(unix)]
fn copy_link(src: &std::path::Path, dst: &std::path::Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(not(unix))]
fn copy_link(src: &std::path::Path, dst: &std::path::Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
