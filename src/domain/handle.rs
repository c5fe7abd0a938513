//! Opaque client handles for sandboxed paths.
//!
//! A handle is the URL-safe, unpadded base64 of the root-relative path
//! (`"."` for the root), so it never needs escaping in URLs or JSON. On unix
//! the raw path bytes are encoded, so names that are not UTF-8 round-trip.

use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tracing::warn;

use crate::domain::{Sandbox, SandboxedPath};

/// Encodes and decodes handles against one sandbox.
#[derive(Debug, Clone)]
pub struct HandleCodec {
    sandbox: Sandbox,
}

impl HandleCodec {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn encode(&self, path: &SandboxedPath) -> String {
        if path.is_root() {
            return URL_SAFE_NO_PAD.encode(".");
        }
        URL_SAFE_NO_PAD.encode(path_bytes(path))
    }

    /// Resolve a handle back to a path.
    ///
    /// Returns `None` for tokens that are not base64 or that point outside
    /// the sandbox. Off unix the decoded bytes must also be UTF-8. The empty token is the root.
    pub fn decode(&self, handle: &str) -> Option<SandboxedPath> {
        let token = handle.trim_end_matches('=');
        if token.is_empty() {
            return Some(self.sandbox.root_path());
        }

        let bytes = match URL_SAFE_NO_PAD.decode(token) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(handle, error = %err, "rejecting malformed handle");
                return None;
            }
        };
        let Some(relative) = path_from_bytes(bytes) else {
            warn!(handle, "rejecting handle with non UTF-8 path");
            return None;
        };

        match self.sandbox.resolve(&relative) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(handle, error = %err, "rejecting handle outside the root");
                None
            }
        }
    }
}

#[cfg(unix)]
fn path_bytes(path: &SandboxedPath) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.relative().as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &SandboxedPath) -> Vec<u8> {
    path.relative_display().into_bytes()
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;
    Some(PathBuf::from(OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> Option<PathBuf> {
    String::from_utf8(bytes).ok().map(PathBuf::from)
}
