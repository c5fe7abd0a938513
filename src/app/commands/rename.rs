use tracing::{debug, info};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext};
use crate::domain::AppError;

/// `rename`: move `target` to `current/name`, never overwriting.
pub(crate) fn execute(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let target = ctx.target()?;
    let current = ctx.current()?;
    if !target.exists() && !target.is_symlink() {
        return Err(AppError::InvalidParameters);
    }
    if !connector.perms(&target).rm || !connector.perms(&current).write {
        return Err(AppError::AccessDenied);
    }

    let to = current.join(ctx.name()?)?;
    let kind = target.kind_label();
    if to.exists() || to.is_symlink() {
        return Err(AppError::Conflict(format!(
            "Unable to rename {}. '{}' already exists",
            kind,
            to.file_name()
        )));
    }

    let mut moved = target.clone();
    if let Err(err) = moved.rename(&to) {
        debug!(from = %target, to = %to, error = %err, "rename failed");
        ctx.response.fail(format!("Unable to rename {}", kind));
        return Ok(());
    }
    if let Err(err) = connector.remove_thumbnail(&target) {
        debug!(path = %target, error = %err, "stale thumbnail left behind");
    }

    info!(from = %target, to = %moved, "renamed");
    ctx.tree = moved.is_dir();
    ctx.response.select = Some(vec![connector.hash(&moved)]);
    reopen(connector, ctx)
}

#[cfg(test)]
mod tests {
    use crate::domain::{Request, Response, RuleConfig};
    use crate::testing::FixtureTree;

    fn rename(fixture: &FixtureTree, config: Option<crate::domain::ConnectorConfig>, target: &str, name: &str) -> Response {
        let connector = match config {
            Some(config) => fixture.connector_with(config),
            None => fixture.connector(),
        };
        let request = Request {
            current: Some(fixture.handle("")),
            target: Some(fixture.handle(target)),
            name: Some(name.to_string()),
            ..Request::new("rename")
        };
        connector.run(&request).unwrap().1
    }

    #[test]
    fn renames_file_and_selects_it() {
        let fixture = FixtureTree::new();
        let response = rename(&fixture, None, "README.txt", "README.md");
        assert!(response.error.is_none());
        assert!(!fixture.path("README.txt").exists());
        assert!(fixture.path("README.md").is_file());
        assert_eq!(response.select, Some(vec![fixture.handle("README.md")]));
        assert!(response.tree.is_none());
    }

    #[test]
    fn renaming_a_directory_refreshes_tree() {
        let fixture = FixtureTree::new();
        let response = rename(&fixture, None, "foo", "bar");
        assert!(fixture.path("bar/tom.txt").is_file());
        assert!(response.tree.unwrap().find(&["bar"]).is_some());
    }

    #[test]
    fn existing_destination_is_named_in_error() {
        let fixture = FixtureTree::new();
        let response = rename(&fixture, None, "README.txt", "foo");
        assert_eq!(
            response.error.as_deref(),
            Some("Unable to rename file. 'foo' already exists")
        );
        assert!(fixture.path("README.txt").is_file());
    }

    #[test]
    fn protected_target_is_denied() {
        let fixture = FixtureTree::new();
        let mut config = fixture.config();
        config.perms.push(RuleConfig { path: Some("README.txt".into()), rm: Some(false), ..Default::default() });
        let response = rename(&fixture, Some(config), "README.txt", "other.txt");
        assert_eq!(response.error.as_deref(), Some("Access Denied"));
        assert!(fixture.path("README.txt").is_file());
    }
}
