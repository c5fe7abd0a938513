//! Collision-avoiding sibling names.

use super::SandboxedPath;
use crate::domain::AppError;

impl SandboxedPath {
    /// `self` if no file exists here, otherwise the first free `"<stem> N<ext>"` sibling.
    pub fn unique(&self) -> Result<SandboxedPath, AppError> {
        if !self.is_file() {
            return Ok(self.clone());
        }
        self.first_free_sibling(&self.stem(), 1, |stem, n, ext| format!("{stem} {n}{ext}"))
    }

    /// The first free `"<stem> copy N<ext>"` sibling.
    ///
    /// A stem already ending in `" copy M"` continues counting from `M`.
    pub fn duplicate(&self) -> Result<SandboxedPath, AppError> {
        let stem = self.stem();
        let (base, start) = match split_copy_suffix(&stem) {
            Some((base, n)) => (base.to_string(), n),
            None => (stem, 1),
        };
        self.first_free_sibling(&base, start, |stem, n, ext| format!("{stem} copy {n}{ext}"))
    }

    fn first_free_sibling(
        &self,
        stem: &str,
        start: u64,
        name: impl Fn(&str, u64, &str) -> String,
    ) -> Result<SandboxedPath, AppError> {
        let parent = self.parent().unwrap_or_else(|| self.sandbox.root_path());
        let ext = self.extension();
        let mut n = start;
        loop {
            let candidate = parent.join(name(stem, n, &ext))?;
            if !candidate.exists() {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

/// Split `"<base> copy <digits>"` into its base and number.
fn split_copy_suffix(stem: &str) -> Option<(&str, u64)> {
    let (base, number) = stem.rsplit_once(" copy ")?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok().map(|n| (base, n))
}
