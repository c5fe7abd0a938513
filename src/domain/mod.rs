pub mod command;
pub mod configuration;
pub mod error;
pub mod handle;
pub mod permissions;
pub mod request;
pub mod response;
pub mod sandbox;

pub use command::Command;
pub use configuration::{
    ArchiverConfig, ConnectorConfig, ImageProcessorKind, RuleConfig, ThumbnailConfig, UploadLimit,
};
pub use error::AppError;
pub use handle::HandleCodec;
pub use permissions::{PathMatcher, PermissionEngine, PermissionRule, Permissions};
pub use request::{Request, UploadedFile};
pub use response::{ClientParams, Cwd, Entry, Headers, Response, TreeNode};
pub use sandbox::{Sandbox, SandboxedPath};
