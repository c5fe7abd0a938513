pub mod connector_config;
pub mod parse;
pub mod upload_limit;

pub use connector_config::{
    ArchiverConfig, ConnectorConfig, ImageProcessorKind, RuleConfig, ThumbnailConfig,
};
pub use parse::parse_config_content;
pub use upload_limit::UploadLimit;
