use tracing::{debug, info, warn};

use super::open::reopen;
use crate::app::connector::{Connector, RequestContext};
use crate::domain::{AppError, SandboxedPath};

const DENIED: &str = "Some files were not copied.";
const FAILED: &str = "Some files were unable to be copied";

/// `paste`: copy or move `targets` into `dst`.
///
/// Every source is handled on its own; refused or failed ones are reported in
/// `errorData` and the rest still go through.
pub(crate) fn execute(connector: &Connector, ctx: &mut RequestContext<'_>) -> Result<(), AppError> {
    let dst = ctx
        .request
        .dst
        .as_deref()
        .and_then(|handle| connector.path_for(handle))
        .filter(SandboxedPath::is_dir)
        .ok_or(AppError::InvalidParameters)?;
    if !connector.perms(&dst).write {
        return Err(AppError::AccessDenied);
    }

    let cut = ctx.request.cut;
    let sources = ctx.targets.clone();
    for source in sources {
        let label = source.label();
        let Some(src) = source.path.filter(|p| p.exists() || p.is_symlink()) else {
            ctx.response.fail_item(FAILED, label, "does not exist");
            continue;
        };

        let perms = connector.perms(&src);
        if !perms.read || (cut && !perms.rm) {
            warn!(path = %src, "paste source refused");
            ctx.response.fail_item(DENIED, label, "Access Denied");
            continue;
        }

        let to = match dst.join(src.relative().file_name().unwrap_or_default()) {
            Ok(to) => to,
            Err(err) => {
                warn!(from = %src, error = %err, "paste destination outside the root");
                ctx.response.fail_item(FAILED, label, "Unable to copy");
                continue;
            }
        };
        if to.exists() || to.is_symlink() {
            let detail = format!("already exists in '{}'", connector.display_path(&dst));
            ctx.response.fail_item(FAILED, label, detail);
            continue;
        }
        if src.is_dir() && !src.is_symlink() && to.is_within(&src) {
            ctx.response.fail_item(FAILED, label, "Unable to copy into itself");
            continue;
        }

        match transfer(connector, &src, &to, cut) {
            Ok(()) => info!(from = %src, to = %to, cut, "pasted"),
            Err(err) => {
                debug!(from = %src, to = %to, error = %err, "paste failed");
                ctx.response.fail_item(FAILED, label, "Unable to copy");
            }
        }
    }

    ctx.tree = true;
    reopen(connector, ctx)
}

fn transfer(
    connector: &Connector,
    src: &SandboxedPath,
    to: &SandboxedPath,
    cut: bool,
) -> Result<(), AppError> {
    if !cut {
        return src.copy_to(to);
    }
    let mut moved = src.clone();
    moved.rename(to)?;
    connector.remove_thumbnail(src)
}
