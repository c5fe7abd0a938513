use std::io;

use thiserror::Error;

/// Library-wide error type for connector operations.
///
/// Most variants are recoverable: the connector renders them into the
/// response `error` field. Only [`AppError::is_fatal`] variants escape
/// [`crate::Connector::run`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// A configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A path resolved outside the sandbox root.
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    /// The thumbnails directory is missing and cannot be created.
    #[error("Unable to create thumbs directory: {0}")]
    ThumbnailDirectory(String),

    /// An external tool exited unsuccessfully or could not be spawned.
    #[error("External command '{command}' failed: {details}")]
    ExternalTool { command: String, details: String },

    /// Effective permissions forbid the operation.
    #[error("Access Denied")]
    AccessDenied,

    /// The request named a command the connector does not know.
    #[error("Invalid command '{0}'")]
    InvalidCommand(String),

    /// The command is switched off by configuration.
    #[error("Command '{0}' is disabled")]
    DisabledCommand(String),

    /// A required parameter is missing or a handle did not resolve.
    #[error("Invalid Parameters")]
    InvalidParameters,

    /// The command is known but cannot be served by this connector.
    #[error("Command '{0}' not yet implemented")]
    NotImplemented(String),

    /// The destination entity already exists.
    #[error("{0}")]
    Conflict(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Whether the error indicates a broken deployment rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::ThumbnailDirectory(_))
    }

    /// Coarse `io::ErrorKind` classification, used for CLI exit reporting.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidConfig(_)
            | AppError::InvalidParameters
            | AppError::InvalidCommand(_)
            | AppError::TomlParseError(_)
            | AppError::Json(_) => io::ErrorKind::InvalidInput,
            AppError::PathTraversal(_) | AppError::AccessDenied => {
                io::ErrorKind::PermissionDenied
            }
            AppError::Conflict(_) => io::ErrorKind::AlreadyExists,
            AppError::NotImplemented(_) | AppError::DisabledCommand(_) => {
                io::ErrorKind::Unsupported
            }
            AppError::ThumbnailDirectory(_) | AppError::ExternalTool { .. } => {
                io::ErrorKind::Other
            }
        }
    }
}
