//! Response-shaped views of filesystem nodes.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::debug;

use super::Connector;
use crate::domain::{ClientParams, Cwd, Entry, Response, SandboxedPath, TreeNode};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const DIRECTORY_MIME: &str = "directory";

impl Connector {
    /// Projection of one directory entry.
    ///
    /// Sets `response.tmb` when an image still lacks its thumbnail.
    pub(crate) fn entry_for(&self, path: &SandboxedPath, response: &mut Response) -> Entry {
        let mut entry = Entry {
            name: path.file_name(),
            hash: self.hash(path),
            date: format_date(path.modified()),
            mime: DIRECTORY_MIME.to_string(),
            size: 0,
            perms: self.permissions.evaluate(path),
            url: None,
            resize: None,
            dim: None,
            tmb: None,
            link: None,
            link_to: None,
            parent: None,
        };

        if !path.is_dir() {
            entry.mime = self.mime.mime_for(&path.full_path());
        }
        if path.is_file() {
            entry.size = path.size();
            entry.url = Some(format!("{}/{}", self.config.base_url(), path.relative_display()));
            self.add_image_fields(path, &mut entry, response);
        }
        if path.is_symlink() {
            self.add_link_fields(path, &mut entry);
        }
        entry
    }

    fn add_image_fields(&self, path: &SandboxedPath, entry: &mut Entry, response: &mut Response) {
        let Some(images) = &self.images else {
            return;
        };
        if !entry.mime.contains("image") || !path.readable() {
            return;
        }

        entry.resize = Some(true);
        entry.dim = Some(images.size_of(&path.full_path()));
        if self.config.thumbs.enabled {
            match self.thumbnail_for(path) {
                Ok(thumbnail) if thumbnail.is_file() => entry.tmb = Some(self.thumbnail_url(path)),
                _ => response.tmb = Some(true),
            }
        }
    }

    fn add_link_fields(&self, path: &SandboxedPath, entry: &mut Entry) {
        let (Some(raw), Some(link_dir)) = (path.read_link(), path.parent()) else {
            return;
        };
        let target = match link_dir.join(&raw) {
            Ok(target) => target,
            Err(err) => {
                debug!(link = %path, error = %err, "symlink target outside the root");
                return;
            }
        };
        let target_dir = target.parent().unwrap_or_else(|| self.sandbox().root_path());

        entry.link = Some(self.hash(&target));
        entry.link_to = Some(target.relative_to(&link_dir).to_string_lossy().into_owned());
        entry.parent = Some(self.hash(&target_dir));
    }

    /// Path shown to users: the home label, then the root-relative path.
    pub(crate) fn display_path(&self, path: &SandboxedPath) -> String {
        if path.is_root() {
            self.config.home.clone()
        } else {
            format!("{}/{}", self.config.home, path.relative_display())
        }
    }

    pub(crate) fn cwd_for(&self, dir: &SandboxedPath) -> Cwd {
        let name = if dir.is_root() { self.config.home.clone() } else { dir.file_name() };
        Cwd {
            name,
            hash: self.hash(dir),
            mime: DIRECTORY_MIME.to_string(),
            rel: self.display_path(dir),
            size: 0,
            date: format_date(dir.modified()),
            perms: self.permissions.evaluate(dir),
        }
    }

    /// Visible children of `dir`, in display order.
    pub(crate) fn visible_children(&self, dir: &SandboxedPath) -> Vec<SandboxedPath> {
        let children = match dir.children() {
            Ok(children) => children,
            Err(err) => {
                debug!(dir = %dir, error = %err, "unable to list directory");
                return Vec::new();
            }
        };
        children.into_iter().filter(|child| self.is_visible(child)).collect()
    }

    fn is_visible(&self, path: &SandboxedPath) -> bool {
        !self.is_thumbnail_directory(path) && !self.permissions.evaluate(path).hidden
    }

    /// The whole directory tree, rooted at the home label.
    pub(crate) fn tree(&self) -> TreeNode {
        let root = self.sandbox().root_path();
        TreeNode {
            name: self.config.home.clone(),
            hash: self.hash(&root),
            dirs: self.subtree(&root),
            perms: self.permissions.evaluate(&root),
        }
    }

    fn subtree(&self, dir: &SandboxedPath) -> Vec<TreeNode> {
        self.visible_children(dir)
            .into_iter()
            .filter(SandboxedPath::is_dir)
            .map(|child| TreeNode {
                name: child.file_name(),
                hash: self.hash(&child),
                // Linked directories are listed but not descended into.
                dirs: if child.is_symlink() { Vec::new() } else { self.subtree(&child) },
                perms: self.permissions.evaluate(&child),
            })
            .collect()
    }

    pub(crate) fn client_params(&self) -> ClientParams {
        ClientParams {
            dot_files: self.config.allow_dot_files,
            upl_max_size: self.config.upload_max_size.clone(),
            archives: self.config.archivers.keys().cloned().collect(),
            extract: self.config.extractors.keys().cloned().collect(),
            url: self.config.url.clone(),
        }
    }
}

fn format_date(time: Option<SystemTime>) -> String {
    time.map(|t| DateTime::<Local>::from(t).format(DATE_FORMAT).to_string()).unwrap_or_default()
}
