//! The request dispatcher.
//!
//! A [`Connector`] is built once from configuration and is immutable
//! afterwards; every call to [`Connector::run`] works on its own
//! request-scoped state, so one instance can serve concurrent requests.

mod context;
mod projection;
mod thumbnails;

use std::path::Path;

use tracing::{debug, warn};

use crate::adapters::{ExtensionMimeTypes, ImageMagick, OriginalFilename, ProcessToolRunner};
use crate::app::commands;
use crate::domain::{
    AppError, Command, ConnectorConfig, HandleCodec, Headers, ImageProcessorKind,
    PermissionEngine, Permissions, Request, Response, Sandbox, SandboxedPath,
};
use crate::ports::{ImageProcessor, MimeResolver, ToolRunner, UploadNameResolver};

pub(crate) use context::{RequestContext, is_plain_name};

pub struct Connector {
    config: ConnectorConfig,
    codec: HandleCodec,
    permissions: PermissionEngine,
    mime: Box<dyn MimeResolver>,
    images: Option<Box<dyn ImageProcessor>>,
    tools: Box<dyn ToolRunner>,
    upload_names: Box<dyn UploadNameResolver>,
}

impl Connector {
    /// Build a connector with the default collaborators.
    ///
    /// Fails when the configuration is invalid or the root is not an
    /// existing directory.
    pub fn new(config: ConnectorConfig) -> Result<Self, AppError> {
        config.validate()?;
        let sandbox = Sandbox::new(&config.root)?;
        let permissions = PermissionEngine::new(config.default_perms, config.permission_rules()?);
        let images: Option<Box<dyn ImageProcessor>> = match config.image_processor {
            ImageProcessorKind::Imagemagick => Some(Box::new(ImageMagick)),
            ImageProcessorKind::None => None,
        };

        Ok(Self {
            config,
            codec: HandleCodec::new(sandbox),
            permissions,
            mime: Box::new(ExtensionMimeTypes),
            images,
            tools: Box::new(ProcessToolRunner),
            upload_names: Box::new(OriginalFilename),
        })
    }

    pub fn with_mime_resolver(mut self, mime: impl MimeResolver + 'static) -> Self {
        self.mime = Box::new(mime);
        self
    }

    pub fn with_image_processor(mut self, images: impl ImageProcessor + 'static) -> Self {
        self.images = Some(Box::new(images));
        self
    }

    pub fn without_image_processor(mut self) -> Self {
        self.images = None;
        self
    }

    pub fn with_tool_runner(mut self, tools: impl ToolRunner + 'static) -> Self {
        self.tools = Box::new(tools);
        self
    }

    pub fn with_upload_name_resolver(mut self, names: impl UploadNameResolver + 'static) -> Self {
        self.upload_names = Box::new(names);
        self
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn sandbox(&self) -> &Sandbox {
        self.codec.sandbox()
    }

    /// Handle for a root-relative path.
    pub fn handle_for(&self, relative: impl AsRef<Path>) -> Result<String, AppError> {
        Ok(self.hash(&self.sandbox().resolve(relative)?))
    }

    /// Path for a handle; `None` when it is malformed or escapes the root.
    pub fn path_for(&self, handle: &str) -> Option<SandboxedPath> {
        self.codec.decode(handle)
    }

    /// Run one request.
    ///
    /// Recoverable failures are reported in [`Response::error`]; only fatal
    /// ones (a missing thumbnails directory that cannot be created) return `Err`.
    pub fn run(&self, request: &Request) -> Result<(Headers, Response), AppError> {
        let mut ctx = RequestContext::new(request);
        match self.dispatch(&mut ctx) {
            Ok(()) => {}
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(cmd = %request.cmd, error = %err, "request failed");
                ctx.response.fail(err.to_string());
            }
        }
        Ok(ctx.finish())
    }

    fn dispatch(&self, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
        let command: Command = ctx.request.cmd.parse()?;
        if self.config.disabled_commands.contains(&command) {
            return Err(AppError::DisabledCommand(command.to_string()));
        }

        self.ensure_thumbnail_directory()?;
        ctx.resolve(&self.codec);
        debug!(
            %command,
            current = ?ctx.current,
            target = ?ctx.target,
            targets = ctx.targets.len(),
            "dispatching request"
        );

        match command {
            Command::Open => commands::open::execute(self, ctx),
            Command::Mkdir => commands::mkdir::mkdir(self, ctx),
            Command::Mkfile => commands::mkdir::mkfile(self, ctx),
            Command::Rename => commands::rename::execute(self, ctx),
            Command::Upload => commands::upload::execute(self, ctx),
            Command::Ping => commands::ping::execute(ctx),
            Command::Paste => commands::paste::execute(self, ctx),
            Command::Rm => commands::remove::execute(self, ctx),
            Command::Duplicate => commands::duplicate::execute(self, ctx),
            Command::Read => commands::content::read(self, ctx),
            Command::Edit => commands::content::edit(self, ctx),
            Command::Extract => commands::archive::extract(self, ctx),
            Command::Archive => commands::archive::archive(self, ctx),
            Command::Tmb => commands::images::tmb(self, ctx),
            Command::Resize => commands::images::resize(self, ctx),
        }
    }

    pub(crate) fn hash(&self, path: &SandboxedPath) -> String {
        self.codec.encode(path)
    }

    pub(crate) fn perms(&self, path: &SandboxedPath) -> Permissions {
        self.permissions.evaluate(path)
    }

    pub(crate) fn mime_for(&self, path: &SandboxedPath) -> String {
        self.mime.mime_for(&path.full_path())
    }

    pub(crate) fn image_processor(&self) -> Option<&dyn ImageProcessor> {
        self.images.as_deref()
    }

    pub(crate) fn tool_runner(&self) -> &dyn ToolRunner {
        self.tools.as_ref()
    }

    pub(crate) fn upload_name_for(&self, file: &crate::domain::UploadedFile) -> String {
        self.upload_names.name_for(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixtureTree;

    #[test]
    fn connector_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Connector>();
    }

    #[test]
    fn missing_root_is_a_configuration_error() {
        let config = ConnectorConfig::new("/definitely/not/here", "/files");
        assert!(matches!(Connector::new(config), Err(AppError::Configuration(_))));
    }

    #[test]
    fn invalid_command_is_reported_not_raised() {
        let fixture = FixtureTree::new();
        let (headers, response) = fixture.connector().run(&Request::new("INVALID")).unwrap();
        assert!(headers.is_empty());
        assert_eq!(response.error.as_deref(), Some("Invalid command 'INVALID'"));
    }

    #[test]
    fn disabled_command_is_refused() {
        let fixture = FixtureTree::new();
        let mut config = fixture.config();
        config.disabled_commands = vec![Command::Mkdir];
        let connector = fixture.connector_with(config);

        let mut request = Request::new("mkdir");
        request.current = Some(connector.handle_for("").unwrap());
        request.name = Some("blocked".to_string());
        let (_, response) = connector.run(&request).unwrap();

        assert_eq!(response.error.as_deref(), Some("Command 'mkdir' is disabled"));
        assert!(!fixture.path("blocked").exists());
    }

    #[test]
    fn handle_for_root_is_dot() {
        let fixture = FixtureTree::new();
        let connector = fixture.connector();
        assert_eq!(connector.handle_for("").unwrap(), "Lg");
        assert_eq!(connector.path_for("Lg"), Some(connector.sandbox().root_path()));
        assert!(connector.handle_for("../outside").is_err());
    }
}
