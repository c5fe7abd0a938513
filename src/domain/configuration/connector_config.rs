//! Connector configuration domain models.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::UploadLimit;
use crate::domain::permissions::{PermissionRule, Permissions};
use crate::domain::{AppError, Command};

/// Everything a connector needs, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Directory all operations are confined to.
    pub root: PathBuf,
    /// Public base URL the root is served under.
    pub url: String,
    /// Display label for the root.
    #[serde(default = "default_home")]
    pub home: String,
    #[serde(default)]
    pub default_perms: Permissions,
    #[serde(default)]
    pub perms: Vec<RuleConfig>,
    #[serde(default)]
    pub disabled_commands: Vec<Command>,
    /// Echoed to the client; the connector itself never filters dot files.
    #[serde(default = "default_true")]
    pub allow_dot_files: bool,
    #[serde(default)]
    pub upload_max_size: UploadLimit,
    #[serde(default = "default_upload_file_mode")]
    pub upload_file_mode: u32,
    /// Archive MIME type to archiver.
    #[serde(default)]
    pub archivers: BTreeMap<String, ArchiverConfig>,
    /// Archive MIME type to extractor command line.
    #[serde(default)]
    pub extractors: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub image_processor: ImageProcessorKind,
    #[serde(default)]
    pub thumbs: ThumbnailConfig,
}

impl ConnectorConfig {
    /// A configuration with every optional setting at its default.
    pub fn new(root: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url: url.into(),
            home: default_home(),
            default_perms: Permissions::default(),
            perms: Vec::new(),
            disabled_commands: Vec::new(),
            allow_dot_files: default_true(),
            upload_max_size: UploadLimit::default(),
            upload_file_mode: default_upload_file_mode(),
            archivers: BTreeMap::new(),
            extractors: BTreeMap::new(),
            image_processor: ImageProcessorKind::default(),
            thumbs: ThumbnailConfig::default(),
        }
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn permission_rules(&self) -> Result<Vec<PermissionRule>, AppError> {
        self.perms.iter().map(PermissionRule::from_config).collect()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.url.trim().is_empty() {
            return Err(AppError::InvalidConfig("url must not be empty".to_string()));
        }
        if self.home.trim().is_empty() {
            return Err(AppError::InvalidConfig("home must not be empty".to_string()));
        }
        self.permission_rules()?;
        for (mime, archiver) in &self.archivers {
            if archiver.command.is_empty() {
                return Err(AppError::InvalidConfig(format!(
                    "archiver for '{}' has an empty command",
                    mime
                )));
            }
        }
        for (mime, command) in &self.extractors {
            if command.is_empty() {
                return Err(AppError::InvalidConfig(format!(
                    "extractor for '{}' has an empty command",
                    mime
                )));
            }
        }
        self.thumbs.validate()?;
        Ok(())
    }
}

/// One permission rule as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Exact root-relative path (`"."` for the root).
    pub path: Option<String>,
    /// Regular expression searched in the root-relative path.
    pub pattern: Option<String>,
    pub read: Option<bool>,
    pub write: Option<bool>,
    pub rm: Option<bool>,
    pub hidden: Option<bool>,
}

/// An external archiver: output extension plus command line.
///
/// The command runs in the destination directory with the archive name and
/// then each source name appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiverConfig {
    /// Extension including the dot, e.g. `".zip"`.
    pub extension: String,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProcessorKind {
    #[default]
    Imagemagick,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThumbnailConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Directory under the root holding generated thumbnails.
    #[serde(default = "default_thumbs_directory")]
    pub directory: String,
    /// Edge length in pixels.
    #[serde(default = "default_thumbs_size")]
    pub size: u32,
    /// Thumbnails generated per `tmb` call.
    #[serde(default = "default_thumbs_at_once")]
    pub at_once: usize,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: default_thumbs_directory(),
            size: default_thumbs_size(),
            at_once: default_thumbs_at_once(),
        }
    }
}

impl ThumbnailConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut components = Path::new(&self.directory).components();
        let single_segment = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_segment {
            return Err(AppError::InvalidConfig(format!(
                "thumbs.directory must be a single directory name, got '{}'",
                self.directory
            )));
        }
        if self.size == 0 {
            return Err(AppError::InvalidConfig("thumbs.size must be greater than 0".to_string()));
        }
        if self.at_once == 0 {
            return Err(AppError::InvalidConfig(
                "thumbs.at_once must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_home() -> String {
    "Home".to_string()
}

fn default_true() -> bool {
    true
}

fn default_upload_file_mode() -> u32 {
    0o644
}

fn default_thumbs_directory() -> String {
    ".thumbs".to_string()
}

fn default_thumbs_size() -> u32 {
    48
}

fn default_thumbs_at_once() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConnectorConfig::new("/srv/files", "/elfinder/");
        assert_eq!(config.home, "Home");
        assert_eq!(config.base_url(), "/elfinder");
        assert_eq!(config.upload_file_mode, 0o644);
        assert!(config.allow_dot_files);
        assert!(!config.thumbs.enabled);
        assert_eq!(config.thumbs.directory, ".thumbs");
        assert_eq!(config.image_processor, ImageProcessorKind::Imagemagick);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_url_is_invalid() {
        let config = ConnectorConfig::new("/srv", " ");
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn thumbs_directory_must_be_one_segment() {
        for directory in ["", "..", "a/b", "/abs", "."] {
            let thumbs = ThumbnailConfig { directory: directory.to_string(), ..Default::default() };
            assert!(thumbs.validate().is_err(), "accepted '{}'", directory);
        }
        let thumbs = ThumbnailConfig { directory: ".previews".to_string(), ..Default::default() };
        assert!(thumbs.validate().is_ok());
    }

    #[test]
    fn thumbs_sizes_must_be_positive() {
        assert!(ThumbnailConfig { size: 0, ..Default::default() }.validate().is_err());
        assert!(ThumbnailConfig { at_once: 0, ..Default::default() }.validate().is_err());
    }

    #[test]
    fn empty_tool_commands_are_invalid() {
        let mut config = ConnectorConfig::new("/srv", "/files");
        config.extractors.insert("application/zip".to_string(), vec![]);
        assert!(config.validate().is_err());

        let mut config = ConnectorConfig::new("/srv", "/files");
        config.archivers.insert(
            "application/zip".to_string(),
            ArchiverConfig { extension: ".zip".to_string(), command: vec![] },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_rule_is_rejected() {
        let mut config = ConnectorConfig::new("/srv", "/files");
        config.perms.push(RuleConfig { pattern: Some("[".to_string()), ..Default::default() });
        assert!(config.validate().is_err());
    }
}
