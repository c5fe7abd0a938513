use tracing::{info, warn};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext};
use crate::domain::AppError;

/// `duplicate`: copy `target` beside itself as "<stem> copy N<ext>".
pub(crate) fn execute(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let target = ctx.target()?;
    let parent = target.parent().ok_or(AppError::InvalidParameters)?;
    if !target.exists() && !target.is_symlink() {
        return Err(AppError::InvalidParameters);
    }

    if !connector.perms(&target).read {
        ctx.response.fail_item("Access Denied", target.file_name(), "Unable to read");
        return Ok(());
    }
    if !connector.perms(&parent).write {
        ctx.response.fail_item("Access Denied", parent.relative_display(), "Unable to write");
        return Ok(());
    }

    let copied = target.duplicate().and_then(|copy| target.copy_to(&copy).map(|()| copy));
    let copy = match copied {
        Ok(copy) => copy,
        Err(err) => {
            warn!(path = %target, error = %err, "duplicate failed");
            ctx.response.fail_item("Unable to duplicate", target.file_name(), "Unable to write");
            return Ok(());
        }
    };
    info!(from = %target, to = %copy, "duplicated");

    ctx.response.select = Some(vec![connector.hash(&copy)]);
    reopen(connector, ctx)
}
