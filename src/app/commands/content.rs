use tracing::info;

use crate::app::connector::{Connector, RequestContext};
use crate::domain::{AppError, SandboxedPath};

/// `read`: return the raw text of `target`.
pub(crate) fn read(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let target = target_file(ctx)?;
    if !connector.perms(&target).read {
        return Err(AppError::AccessDenied);
    }
    ctx.response.content = Some(target.read_to_string()?);
    Ok(())
}

/// `edit`: overwrite `target` with `content` and return its new projection.
pub(crate) fn edit(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let target = target_file(ctx)?;
    let perms = connector.perms(&target);
    if !perms.read || !perms.write {
        return Err(AppError::AccessDenied);
    }
    let content = ctx.request.content.as_deref().ok_or(AppError::InvalidParameters)?;

    target.write(content)?;
    info!(path = %target, bytes = content.len(), "edited file");
    let entry = connector.entry_for(&target, &mut ctx.response);
    ctx.response.file = Some(entry);
    Ok(())
}

fn target_file(ctx: &RequestContext<'_>) -> Result<SandboxedPath, AppError> {
    Some(ctx.target()?).filter(SandboxedPath::is_file).ok_or(AppError::InvalidParameters)
}

#[cfg(test)]
mod tests {
    use crate::domain::{Request, RuleConfig};
    use crate::testing::FixtureTree;
    use std::fs;

    #[test]
    fn read_returns_file_content() {
        let fixture = FixtureTree::new();
        let request = Request { target: Some(fixture.handle("foo/tom.txt")), ..Request::new("read") };
        let (_, response) = fixture.connector().run(&request).unwrap();
        assert_eq!(response.content.as_deref(), Some("tom"));
    }

    #[test]
    fn read_of_directory_is_invalid() {
        let fixture = FixtureTree::new();
        let request = Request { target: Some(fixture.handle("foo")), ..Request::new("read") };
        let (_, response) = fixture.connector().run(&request).unwrap();
        assert_eq!(response.error.as_deref(), Some("Invalid Parameters"));
    }

    #[test]
    fn edit_writes_and_projects_file() {
        let fixture = FixtureTree::new();
        let request = Request {
            target: Some(fixture.handle("README.txt")),
            content: Some("Hello world".into()),
            ..Request::new("edit")
        };
        let (_, response) = fixture.connector().run(&request).unwrap();

        assert_eq!(fs::read_to_string(fixture.path("README.txt")).unwrap(), "Hello world");
        let file = response.file.unwrap();
        assert_eq!(file.name, "README.txt");
        assert_eq!(file.size, 11);
    }

    #[test]
    fn edit_of_write_protected_file_is_denied() {
        let fixture = FixtureTree::new();
        let before = fs::read_to_string(fixture.path("README.txt")).unwrap();
        let mut config = fixture.config();
        config.perms.push(RuleConfig { path: Some("README.txt".into()), write: Some(false), ..Default::default() });
        let request = Request {
            target: Some(fixture.handle("README.txt")),
            content: Some("Hello world".into()),
            ..Request::new("edit")
        };
        let (_, response) = fixture.connector_with(config).run(&request).unwrap();

        assert_eq!(response.error.as_deref(), Some("Access Denied"));
        assert_eq!(fs::read_to_string(fixture.path("README.txt")).unwrap(), before);
    }

    #[test]
    fn edit_without_content_is_invalid() {
        let fixture = FixtureTree::new();
        let request = Request { target: Some(fixture.handle("README.txt")), ..Request::new("edit") };
        let (_, response) = fixture.connector().run(&request).unwrap();
        assert_eq!(response.error.as_deref(), Some("Invalid Parameters"));
    }
}
