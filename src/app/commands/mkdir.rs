use tracing::info;

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext};
use crate::domain::{AppError, SandboxedPath};

/// `mkdir`: create `current/name` and select it.
pub(crate) fn mkdir(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let Some(dir) = new_entry(connector, ctx)? else {
        ctx.response.fail("Unable to create folder");
        return Ok(());
    };
    if dir.mkdir().is_err() {
        ctx.response.fail("Unable to create folder");
        return Ok(());
    }

    info!(path = %dir, "created directory");
    ctx.tree = true;
    ctx.response.select = Some(vec![connector.hash(&dir)]);
    reopen(connector, ctx)
}

/// `mkfile`: create an empty `current/name` and select it.
pub(crate) fn mkfile(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let Some(file) = new_entry(connector, ctx)? else {
        ctx.response.fail("Unable to create file");
        return Ok(());
    };
    if file.create_file().is_err() {
        ctx.response.fail("Unable to create file");
        return Ok(());
    }

    info!(path = %file, "created file");
    ctx.response.select = Some(vec![connector.hash(&file)]);
    reopen(connector, ctx)
}

/// The path to create, or `None` when something already occupies it.
fn new_entry(
    connector: &Connector,
    ctx: &RequestContext<'_>,
) -> Result<Option<SandboxedPath>, AppError> {
    let current = ctx.current()?;
    if !connector.perms(&current).write {
        return Err(AppError::AccessDenied);
    }
    let path = current.join(ctx.name()?)?;
    Ok((!path.exists() && !path.is_symlink()).then_some(path))
}

#[cfg(test)]
mod tests {
    use crate::domain::{Request, RuleConfig};
    use crate::testing::FixtureTree;

    fn create(fixture: &FixtureTree, cmd: &str, name: &str) -> crate::domain::Response {
        let request = Request {
            current: Some(fixture.handle("")),
            name: Some(name.to_string()),
            ..Request::new(cmd)
        };
        fixture.connector().run(&request).unwrap().1
    }

    #[test]
    fn mkdir_creates_and_selects() {
        let fixture = FixtureTree::new();
        let response = create(&fixture, "mkdir", "new_dir");

        assert!(response.error.is_none());
        assert!(fixture.path("new_dir").is_dir());
        assert_eq!(response.select, Some(vec![fixture.handle("new_dir")]));
        assert!(response.tree.unwrap().find(&["new_dir"]).is_some());
        assert!(response.cdc.unwrap().iter().any(|e| e.name == "new_dir"));
    }

    #[test]
    fn mkdir_collision_changes_nothing() {
        let fixture = FixtureTree::new();
        let response = create(&fixture, "mkdir", "README.txt");
        assert!(response.error.unwrap().to_lowercase().contains("unable"));
        assert!(fixture.path("README.txt").is_file());
        assert!(response.select.is_none());
    }

    #[test]
    fn mkfile_creates_empty_file() {
        let fixture = FixtureTree::new();
        let response = create(&fixture, "mkfile", "notes.txt");
        assert!(response.error.is_none());
        assert_eq!(std::fs::read(fixture.path("notes.txt")).unwrap(), b"");
        assert!(response.tree.is_none());
    }

    #[test]
    fn surrounding_spaces_are_kept_in_names() {
        let fixture = FixtureTree::new();
        let response = create(&fixture, "mkfile", " notes.txt ");
        assert!(response.error.is_none());
        assert!(fixture.path(" notes.txt ").is_file());
        assert!(!fixture.path("notes.txt").exists());
    }

    #[test]
    fn mkfile_collision_is_reported() {
        let fixture = FixtureTree::new();
        let response = create(&fixture, "mkfile", "foo");
        assert_eq!(response.error.as_deref(), Some("Unable to create file"));
    }

    #[test]
    fn traversal_names_are_rejected() {
        let fixture = FixtureTree::new();
        let response = create(&fixture, "mkdir", "../escape");
        assert_eq!(response.error.as_deref(), Some("Invalid Parameters"));
        assert!(!fixture.root().parent().unwrap().join("escape").exists());
    }

    #[test]
    fn missing_current_is_invalid() {
        let fixture = FixtureTree::new();
        let request = Request { name: Some("x".into()), ..Request::new("mkdir") };
        let (_, response) = fixture.connector().run(&request).unwrap();
        assert_eq!(response.error.as_deref(), Some("Invalid Parameters"));
    }

    #[test]
    fn read_only_directory_is_denied() {
        let fixture = FixtureTree::new();
        let mut config = fixture.config();
        config.perms.push(RuleConfig { path: Some(".".into()), write: Some(false), ..Default::default() });
        let request = Request {
            current: Some(fixture.handle("")),
            name: Some("blocked".into()),
            ..Request::new("mkdir")
        };
        let (_, response) = fixture.connector_with(config).run(&request).unwrap();
        assert_eq!(response.error.as_deref(), Some("Access Denied"));
        assert!(!fixture.path("blocked").exists());
    }
}
