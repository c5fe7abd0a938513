//! elfc: server-side connector for browser file managers.
//!
//! A [`Connector`] serves protocol commands (`open`, `mkdir`, `upload`,
//! `paste`, `rm`, ...) against a single root directory. Clients refer to
//! files through opaque handles; every handle and name is confined to the
//! root before any filesystem access, and each access is checked against
//! configurable permission rules.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::Connector;
pub use app::api::{connector_at, load_config, parse_request, run_request_at};
pub use domain::configuration::parse_config_content;
pub use domain::{
    AppError, ArchiverConfig, Command, ConnectorConfig, Entry, Headers, ImageProcessorKind,
    Permissions, Request, Response, RuleConfig, ThumbnailConfig, TreeNode, UploadLimit,
    UploadedFile,
};
