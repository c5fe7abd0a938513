//! Root-confined filesystem locations.
//!
//! A [`Sandbox`] owns the canonical root directory. Every [`SandboxedPath`]
//! is created through it and is guaranteed to lie inside that root, both
//! logically (after `.`/`..` normalization) and physically (after resolving
//! the symlinks of its deepest existing ancestor).

mod naming;
mod ops;

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::domain::AppError;

/// Maximum number of dangling symlinks followed while checking confinement.
const MAX_LINK_HOPS: usize = 40;

/// The fixed directory all operations are confined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    root: Arc<Path>,
    /// The root as configured, when it differs from its canonical form.
    alias: Option<Arc<Path>>,
}

impl Sandbox {
    /// Create a sandbox for an existing root directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|e| {
            AppError::config_error(format!("Invalid root directory '{}': {}", root.display(), e))
        })?;
        if !canonical.is_dir() {
            return Err(AppError::config_error(format!(
                "Root '{}' is not a directory",
                root.display()
            )));
        }

        let configured = normalize_path(&std::path::absolute(root)?);
        let alias = (configured != canonical).then(|| Arc::from(configured.as_path()));
        Ok(Self { root: Arc::from(canonical.as_path()), alias })
    }

    /// The canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The root itself as a sandboxed path.
    pub fn root_path(&self) -> SandboxedPath {
        SandboxedPath { sandbox: self.clone(), relative: PathBuf::new() }
    }

    /// Resolve a raw (relative or absolute) path inside the sandbox.
    pub fn resolve(&self, raw: impl AsRef<Path>) -> Result<SandboxedPath, AppError> {
        SandboxedPath::new(self, raw)
    }

    /// Strip the root (canonical or configured form) from a normalized absolute path.
    fn strip_root<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(&self.root)
            .ok()
            .or_else(|| self.alias.as_ref().and_then(|alias| path.strip_prefix(alias).ok()))
    }

    fn contains(&self, resolved: &Path) -> bool {
        resolved.starts_with(&self.root)
    }
}

/// A location guaranteed to lie within a [`Sandbox`].
///
/// Identity is the normalized root-relative path; the empty relative path
/// is the root itself.
#[derive(Clone)]
pub struct SandboxedPath {
    sandbox: Sandbox,
    relative: PathBuf,
}

impl SandboxedPath {
    /// Confine `raw` to the sandbox.
    ///
    /// Fails with [`AppError::PathTraversal`] when the input is an absolute
    /// path outside the root, uses `..` to climb above it, or passes through
    /// a symlink whose target lies outside it.
    pub fn new(sandbox: &Sandbox, raw: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = raw.as_ref();
        let joined = if raw.is_absolute() { raw.to_path_buf() } else { sandbox.root.join(raw) };
        let normalized = normalize_path(&joined);

        let relative = sandbox
            .strip_root(&normalized)
            .ok_or_else(|| AppError::PathTraversal(raw.display().to_string()))?
            .to_path_buf();

        let full = sandbox.root.join(&relative);
        match resolve_existing(&full, MAX_LINK_HOPS) {
            Some(resolved) if sandbox.contains(&resolved) => {}
            _ => return Err(AppError::PathTraversal(raw.display().to_string())),
        }

        Ok(Self { sandbox: sandbox.clone(), relative })
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// The root-relative path (empty for the root).
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// The root-relative path as a string; `"."` for the root.
    pub fn relative_display(&self) -> String {
        if self.is_root() { ".".to_string() } else { self.relative.to_string_lossy().into_owned() }
    }

    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Absolute path on the real filesystem.
    pub fn full_path(&self) -> PathBuf {
        self.sandbox.root.join(&self.relative)
    }

    /// Compose a child path, re-validating confinement.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::new(&self.sandbox, self.relative.join(segment))
    }

    /// The containing directory; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let relative = self.relative.parent().map(Path::to_path_buf).unwrap_or_default();
        Some(Self { sandbox: self.sandbox.clone(), relative })
    }

    /// Final path component; empty for the root.
    pub fn file_name(&self) -> String {
        self.relative.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }

    /// Final component without its extension.
    pub fn stem(&self) -> String {
        self.relative.file_stem().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }

    /// Extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        self.relative
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Whether `self` is `other` or lies beneath it.
    pub fn is_within(&self, other: &SandboxedPath) -> bool {
        self.relative.starts_with(&other.relative)
    }

    /// This path as seen from the directory `base`, e.g. `../foo/tom.txt`.
    pub fn relative_to(&self, base: &SandboxedPath) -> PathBuf {
        let base: Vec<Component> = base.relative.components().collect();
        let path: Vec<Component> = self.relative.components().collect();
        let common = base.iter().zip(&path).take_while(|(a, b)| a == b).count();

        let mut relative = PathBuf::new();
        for _ in common..base.len() {
            relative.push("..");
        }
        for component in &path[common..] {
            relative.push(component);
        }
        relative
    }
}

impl PartialEq for SandboxedPath {
    fn eq(&self, other: &Self) -> bool {
        self.sandbox.root == other.sandbox.root && self.relative == other.relative
    }
}

impl Eq for SandboxedPath {}

impl fmt::Debug for SandboxedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SandboxedPath").field(&self.relative_display()).finish()
    }
}

impl fmt::Display for SandboxedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_display())
    }
}

/// Normalize path by resolving `.` and `..` components logically.
/// This does not access the filesystem.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    let mut ret = if let Some(Component::RootDir) = components.peek() {
        components.next();
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };

    for component in components {
        match component {
            Component::Prefix(..) | Component::RootDir => {
                ret.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                ret.pop();
            }
            Component::Normal(c) => {
                ret.push(c);
            }
        }
    }
    ret
}

/// Physical location of `path`: the deepest existing ancestor is canonicalized
/// and the missing tail re-appended. Dangling symlinks are followed through
/// their targets so a link to a not-yet-existing outside file is caught too.
fn resolve_existing(path: &Path, hops: usize) -> Option<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut tail: Vec<std::ffi::OsString> = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            resolved.extend(tail.iter().rev());
            return Some(resolved);
        }

        if let Ok(link) = std::fs::read_link(&existing) {
            if hops == 0 {
                return None;
            }
            let base = existing.parent()?;
            let target = normalize_path(&base.join(link));
            let mut resolved = resolve_existing(&target, hops - 1)?;
            resolved.extend(tail.iter().rev());
            return Some(resolved);
        }

        tail.push(existing.file_name()?.to_os_string());
        existing = existing.parent()?.to_path_buf();
    }
}
